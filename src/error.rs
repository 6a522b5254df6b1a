//! Error types for blob decoding and configuration

use std::fmt;

/// Structural problems found while decoding a scene or tileset blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Blob is shorter than its fixed header
    TooShort { needed: usize, len: usize },
    /// First four bytes are not the expected tag
    BadMagic([u8; 4]),
    /// Version byte is not one we can read
    UnsupportedVersion(u8),
    /// A read fell outside the blob
    OutOfBounds { offset: usize, len: usize },
    /// Room id beyond the header's room count
    RoomOutOfRange { room: u8, count: u8 },
    /// Tileset declares records smaller than the fields we read
    RecordTooSmall { size: u8, min: usize },
    /// Text span is not valid ASCII/UTF-8
    BadText { offset: usize },
    /// Spawn, exit, object or message index beyond its list count
    IndexOutOfRange {
        kind: &'static str,
        index: u8,
        count: u8,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::TooShort { needed, len } => {
                write!(f, "Blob too short: need {} bytes, have {}", needed, len)
            }
            FormatError::BadMagic(tag) => {
                write!(f, "Bad magic tag {:02x?}", tag)
            }
            FormatError::UnsupportedVersion(v) => {
                write!(f, "Unsupported format version {}", v)
            }
            FormatError::OutOfBounds { offset, len } => {
                write!(f, "Read at offset {:#06x} outside blob of {} bytes", offset, len)
            }
            FormatError::RecordTooSmall { size, min } => {
                write!(f, "Record size {} below minimum {}", size, min)
            }
            FormatError::BadText { offset } => {
                write!(f, "Undecodable text at offset {:#06x}", offset)
            }
            FormatError::RoomOutOfRange { room, count } => {
                write!(f, "Room {} out of range (room count {})", room, count)
            }
            FormatError::IndexOutOfRange { kind, index, count } => {
                write!(f, "{} index {} out of range (count {})", kind, index, count)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Problems loading the TOML settings file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::Parse(error)
    }
}
