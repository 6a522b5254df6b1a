//! Scene blob header
//!
//! The fixed 22-byte `LVL1` header: magic, version, counts, start position
//! and the offsets of the room directory, script streams and message table.

use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::blob::BlobView;
use crate::error::FormatError;

pub const SCENE_MAGIC: [u8; 4] = *b"LVL1";
pub const SCENE_VERSION: u8 = 1;
pub const SCENE_HEADER_SIZE: usize = 22;

pub const HDR_OFS_VERSION: usize = 4;
pub const HDR_OFS_ROOM_COUNT: usize = 5;
pub const HDR_OFS_MAP_WIDTH: usize = 6;
pub const HDR_OFS_MAP_HEIGHT: usize = 7;
pub const HDR_OFS_FLAG_COUNT: usize = 8;
pub const HDR_OFS_VAR_COUNT: usize = 9;
pub const HDR_OFS_ITEM_COUNT: usize = 10;
pub const HDR_OFS_MSG_COUNT: usize = 11;
pub const HDR_OFS_START_ROOM: usize = 12;
pub const HDR_OFS_START_SPAWN: usize = 13;
pub const HDR_OFS_ROOM_DIR: usize = 14;
pub const HDR_OFS_COND_STREAM: usize = 16;
pub const HDR_OFS_ACT_STREAM: usize = 18;
pub const HDR_OFS_MSG_TABLE: usize = 20;

/// True iff the blob starts with the scene tag and carries the supported
/// version. Checked before anything else is read.
pub fn validate(bytes: &[u8]) -> bool {
    bytes.len() > HDR_OFS_VERSION
        && bytes[..4] == SCENE_MAGIC
        && bytes[HDR_OFS_VERSION] == SCENE_VERSION
}

/// Fixed-layout header at the start of every scene blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeader {
    pub version: u8,
    pub room_count: u8,
    pub map_width: u8,
    pub map_height: u8,
    pub flag_count: u8,
    pub var_count: u8,
    pub item_count: u8,
    pub message_count: u8,
    pub start_room: u8,
    pub start_spawn: u8,
    pub room_directory: u16,
    pub condition_stream: u16,
    pub action_stream: u16,
    pub message_table: u16,
}

impl SceneHeader {
    pub fn parse(bytes: &[u8]) -> Result<SceneHeader, FormatError> {
        if bytes.len() < SCENE_HEADER_SIZE {
            return Err(FormatError::TooShort {
                needed: SCENE_HEADER_SIZE,
                len: bytes.len(),
            });
        }
        let view = BlobView::new(bytes);
        let magic = *view.array::<4>(0)?;
        if magic != SCENE_MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        let version = view.u8_at(HDR_OFS_VERSION)?;
        if version != SCENE_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        Ok(SceneHeader {
            version,
            room_count: view.u8_at(HDR_OFS_ROOM_COUNT)?,
            map_width: view.u8_at(HDR_OFS_MAP_WIDTH)?,
            map_height: view.u8_at(HDR_OFS_MAP_HEIGHT)?,
            flag_count: view.u8_at(HDR_OFS_FLAG_COUNT)?,
            var_count: view.u8_at(HDR_OFS_VAR_COUNT)?,
            item_count: view.u8_at(HDR_OFS_ITEM_COUNT)?,
            message_count: view.u8_at(HDR_OFS_MSG_COUNT)?,
            start_room: view.u8_at(HDR_OFS_START_ROOM)?,
            start_spawn: view.u8_at(HDR_OFS_START_SPAWN)?,
            room_directory: view.u16_at(HDR_OFS_ROOM_DIR)?,
            condition_stream: view.u16_at(HDR_OFS_COND_STREAM)?,
            action_stream: view.u16_at(HDR_OFS_ACT_STREAM)?,
            message_table: view.u16_at(HDR_OFS_MSG_TABLE)?,
        })
    }
}

impl Display for SceneHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "
Scene version:            {}
Rooms:                    {}
Map size:                 {}x{}
Flags / vars / items:     {} / {} / {}
Messages:                 {}
Start:                    room {} spawn {}
Room directory address:   {:#06x}
Condition stream address: {:#06x}
Action stream address:    {:#06x}
Message table address:    {:#06x}
",
            self.version,
            self.room_count,
            self.map_width,
            self.map_height,
            self.flag_count,
            self.var_count,
            self.item_count,
            self.message_count,
            self.start_room,
            self.start_spawn,
            self.room_directory,
            self.condition_stream,
            self.action_stream,
            self.message_table,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn raw_header() -> Vec<u8> {
        let mut b = vec![0u8; SCENE_HEADER_SIZE];
        b[..4].copy_from_slice(&SCENE_MAGIC);
        b[HDR_OFS_VERSION] = SCENE_VERSION;
        b[HDR_OFS_ROOM_COUNT] = 3;
        b[HDR_OFS_MAP_WIDTH] = 20;
        b[HDR_OFS_MAP_HEIGHT] = 12;
        b[HDR_OFS_ROOM_DIR] = 0x16;
        b[HDR_OFS_MSG_TABLE] = 0x34;
        b[HDR_OFS_MSG_TABLE + 1] = 0x12;
        b
    }

    #[test]
    fn parses_fields() {
        let h = SceneHeader::parse(&raw_header()).unwrap();
        assert_eq!(h.room_count, 3);
        assert_eq!(h.map_width, 20);
        assert_eq!(h.map_height, 12);
        assert_eq!(h.room_directory, 0x16);
        assert_eq!(h.message_table, 0x1234);
        log::debug!("{}", h);
    }

    #[test]
    fn rejects_bad_magic_and_version() {
        let mut b = raw_header();
        b[0] = b'X';
        assert!(!validate(&b));
        assert!(matches!(SceneHeader::parse(&b), Err(FormatError::BadMagic(_))));

        let mut b = raw_header();
        b[HDR_OFS_VERSION] = 2;
        assert!(!validate(&b));
        assert_eq!(
            SceneHeader::parse(&b),
            Err(FormatError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let b = raw_header();
        assert!(validate(&b[..8]));
        assert_eq!(
            SceneHeader::parse(&b[..8]),
            Err(FormatError::TooShort {
                needed: SCENE_HEADER_SIZE,
                len: 8
            })
        );
        assert!(!validate(&[]));
    }
}
