//! Tile description codec
//!
//! Every getter degrades to a neutral value when the tileset is missing,
//! malformed, or the tile id is unknown, so a room can always be drawn and
//! walked even without tile metadata.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use log::{debug, warn};

use crate::blob::BlobView;
use crate::boot;
use crate::error::FormatError;

pub const TILESET_MAGIC: [u8; 4] = *b"TSET";
pub const TILESET_VERSION: u8 = 1;
pub const TILESET_HEADER_SIZE: usize = 17;
/// Smallest record that holds every field we read
pub const TILESET_RECORD_SIZE: usize = 12;

const HDR_OFS_VERSION: usize = 4;
const HDR_OFS_TILE_W: usize = 5;
const HDR_OFS_TILE_H: usize = 6;
const HDR_OFS_TILE_COUNT: usize = 7;
const HDR_OFS_REC_SIZE: usize = 8;
const HDR_OFS_RECORDS: usize = 9;
const HDR_OFS_NAMES: usize = 11;
const HDR_OFS_BG: usize = 13;
const HDR_OFS_MC1: usize = 14;
const HDR_OFS_MC2: usize = 15;

const REC_OFS_ID: usize = 0;
const REC_OFS_CHARS: usize = 1;
const REC_OFS_COLOR_MODE: usize = 5;
const REC_OFS_COLORS: usize = 6;
const REC_OFS_FLAGS: usize = 10;

pub const DEFAULT_CHARS: [u8; 4] = [32, 32, 32, 32];
pub const DEFAULT_COLORS: [u8; 4] = [1, 1, 1, 1];

bitflags! {
    /// Collision/behavior bits from a tile record's flag word. Unnamed bits
    /// are kept as stored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct TileFlags: u16 {
        const SOLID = 1 << 0;
        const DECOR = 1 << 1;
        const STANDABLE = 1 << 2;
        const LADDER = 1 << 3;
        const DOOR = 1 << 4;
        const INTERACTABLE = 1 << 5;
        const FLOOR = 1 << 6;
        const HAZARD = 1 << 7;
    }
}

/// Decoded tile record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecord {
    pub id: u8,
    /// Glyphs for a 2x2 tile: top-left, top-right, bottom-left, bottom-right
    pub chars: [u8; 4],
    pub color_mode: u8,
    pub colors: [u8; 4],
    pub flags: TileFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetHeader {
    pub version: u8,
    pub tile_width: u8,
    pub tile_height: u8,
    pub tile_count: u8,
    pub record_size: u8,
    pub records: u16,
    pub names: u16,
    pub background: u8,
    pub multicolor1: u8,
    pub multicolor2: u8,
}

/// True iff the blob carries the tileset tag and supported version
pub fn valid(bytes: &[u8]) -> bool {
    bytes.len() > HDR_OFS_VERSION
        && bytes[..4] == TILESET_MAGIC
        && bytes[HDR_OFS_VERSION] == TILESET_VERSION
}

impl TilesetHeader {
    pub fn parse(bytes: &[u8]) -> Result<TilesetHeader, FormatError> {
        if bytes.len() < TILESET_HEADER_SIZE {
            return Err(FormatError::TooShort {
                needed: TILESET_HEADER_SIZE,
                len: bytes.len(),
            });
        }
        let view = BlobView::new(bytes);
        let magic = *view.array::<4>(0)?;
        if magic != TILESET_MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        let version = view.u8_at(HDR_OFS_VERSION)?;
        if version != TILESET_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let record_size = view.u8_at(HDR_OFS_REC_SIZE)?;
        if (record_size as usize) < TILESET_RECORD_SIZE {
            return Err(FormatError::RecordTooSmall {
                size: record_size,
                min: TILESET_RECORD_SIZE,
            });
        }
        Ok(TilesetHeader {
            version,
            tile_width: view.u8_at(HDR_OFS_TILE_W)?,
            tile_height: view.u8_at(HDR_OFS_TILE_H)?,
            tile_count: view.u8_at(HDR_OFS_TILE_COUNT)?,
            record_size,
            records: view.u16_at(HDR_OFS_RECORDS)?,
            names: view.u16_at(HDR_OFS_NAMES)?,
            background: view.u8_at(HDR_OFS_BG)?,
            multicolor1: view.u8_at(HDR_OFS_MC1)?,
            multicolor2: view.u8_at(HDR_OFS_MC2)?,
        })
    }
}

impl fmt::Display for TilesetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "
Tileset version:          {}
Tile size:                {}x{}
Tiles:                    {} x {} bytes
Record table address:     {:#06x}
Palette (bg/mc1/mc2):     {} / {} / {}
",
            self.version,
            self.tile_width,
            self.tile_height,
            self.tile_count,
            self.record_size,
            self.records,
            self.background,
            self.multicolor1,
            self.multicolor2,
        )
    }
}

/// Tile metadata, possibly absent
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    inner: Option<(Arc<[u8]>, TilesetHeader)>,
}

impl Tileset {
    pub fn load(bytes: impl Into<Arc<[u8]>>) -> Result<Tileset, FormatError> {
        let bytes = bytes.into();
        let header = TilesetHeader::parse(&bytes)?;
        debug!(
            "Loaded tileset: {} tiles of {} bytes",
            header.tile_count, header.record_size
        );
        Ok(Tileset {
            inner: Some((bytes, header)),
        })
    }

    /// Load, or fall back to an absent tileset if the blob is unusable
    pub fn load_or_absent(bytes: impl Into<Arc<[u8]>>) -> Tileset {
        Tileset::load(bytes).unwrap_or_else(|e| {
            warn!("Tileset unusable, rendering with defaults: {}", e);
            Tileset::absent()
        })
    }

    pub fn absent() -> Tileset {
        Tileset { inner: None }
    }

    pub fn builtin() -> Tileset {
        Tileset::load_or_absent(boot::tileset_bytes())
    }

    pub fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    pub fn header(&self) -> Option<&TilesetHeader> {
        self.inner.as_ref().map(|(_, h)| h)
    }

    pub fn tile_count(&self) -> u8 {
        self.header().map(|h| h.tile_count).unwrap_or(0)
    }

    /// Record for `tile_id`, if the tileset is present, the id is declared,
    /// and the record lies inside the blob
    pub fn record(&self, tile_id: u8) -> Option<TileRecord> {
        let (bytes, header) = self.inner.as_ref()?;
        if tile_id >= header.tile_count {
            return None;
        }
        let view = BlobView::new(bytes);
        let base = header.records as usize + tile_id as usize * header.record_size as usize;
        let read = || -> Result<TileRecord, FormatError> {
            Ok(TileRecord {
                id: view.u8_at(base + REC_OFS_ID)?,
                chars: *view.array::<4>(base + REC_OFS_CHARS)?,
                color_mode: view.u8_at(base + REC_OFS_COLOR_MODE)?,
                colors: *view.array::<4>(base + REC_OFS_COLORS)?,
                flags: TileFlags::from_bits_retain(view.u16_at(base + REC_OFS_FLAGS)?),
            })
        };
        read().ok()
    }

    pub fn flags(&self, tile_id: u8) -> TileFlags {
        self.record(tile_id).map(|r| r.flags).unwrap_or_default()
    }

    pub fn chars(&self, tile_id: u8) -> [u8; 4] {
        self.record(tile_id).map(|r| r.chars).unwrap_or(DEFAULT_CHARS)
    }

    pub fn color_mode(&self, tile_id: u8) -> u8 {
        self.record(tile_id).map(|r| r.color_mode).unwrap_or(0)
    }

    pub fn colors(&self, tile_id: u8) -> [u8; 4] {
        self.record(tile_id).map(|r| r.colors).unwrap_or(DEFAULT_COLORS)
    }

    pub fn background(&self) -> u8 {
        self.header().map(|h| h.background).unwrap_or(0)
    }

    pub fn multicolor1(&self) -> u8 {
        self.header().map(|h| h.multicolor1).unwrap_or(0)
    }

    pub fn multicolor2(&self) -> u8 {
        self.header().map(|h| h.multicolor2).unwrap_or(0)
    }

    pub fn is_solid(&self, tile_id: u8) -> bool {
        self.flags(tile_id).contains(TileFlags::SOLID)
    }
}
