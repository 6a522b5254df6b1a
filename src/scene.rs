//! Scene blob codec
//!
//! A [`Scene`] is a validated, immutable scene blob. All accessors read
//! straight out of the shared byte buffer; nothing is copied out except the
//! small fixed records (spawns, exits, objects) which are decoded on demand.
//!
//! Layout, all offsets little-endian and relative to blob start:
//!
//! ```text
//! header (22 bytes)           see crate::header
//! room directory              8 bytes/room: map, spawns, exits, objects
//! per room:
//!   map                       width*height tile ids
//!   spawns                    count, then (x, y)
//!   exits                     count, then (edge, dest room, dest spawn)
//!   objects                   count, then 22-byte records
//! condition stream            opcode triples
//! action stream               opcode triples
//! message table               count, then u16 text offsets
//! message text                NUL-terminated ASCII
//! ```

use std::sync::Arc;

use log::{debug, warn};

use crate::blob::BlobView;
use crate::boot;
use crate::error::FormatError;
use crate::header::SceneHeader;

pub const ROOM_DIR_ENTRY_SIZE: usize = 8;
pub const SPAWN_RECORD_SIZE: usize = 2;
pub const EXIT_RECORD_SIZE: usize = 3;
pub const OBJECT_RECORD_SIZE: usize = 22;
pub const MESSAGE_ENTRY_SIZE: usize = 2;

pub const OBJ_OFS_X: usize = 0;
pub const OBJ_OFS_Y: usize = 1;
pub const OBJ_OFS_TYPE: usize = 2;
pub const OBJ_OFS_VERBS: usize = 3;
pub const OBJ_OFS_P0: usize = 4;
pub const OBJ_OFS_P1: usize = 5;
pub const OBJ_OFS_GATE: usize = 6;
pub const OBJ_OFS_LOOK: usize = 8;
pub const OBJ_OFS_ALT0: usize = 18;
pub const OBJ_OFS_ALT1: usize = 20;

lazy_static! {
    static ref BUILTIN_SCENE: Scene = match Scene::load(boot::scene_bytes()) {
        Ok(scene) => scene,
        Err(e) => unreachable!("built-in scene is malformed: {}", e),
    };
}

/// A counted list of fixed-size records somewhere in the blob.
///
/// This is the one place record indices are checked against their count,
/// so every spawn/exit/object/room/message lookup is validated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordList {
    kind: &'static str,
    first: usize,
    count: u8,
    stride: usize,
}

impl RecordList {
    /// List whose first byte is its own count
    pub fn counted(
        view: &BlobView,
        base: u16,
        stride: usize,
        kind: &'static str,
    ) -> Result<RecordList, FormatError> {
        let count = view.u8_at(base as usize)?;
        Ok(RecordList {
            kind,
            first: base as usize + 1,
            count,
            stride,
        })
    }

    /// List whose count is stored elsewhere (the room directory)
    pub fn fixed(base: u16, count: u8, stride: usize, kind: &'static str) -> RecordList {
        RecordList {
            kind,
            first: base as usize,
            count,
            stride,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Blob offset of record `index`, or an error if `index >= count`
    pub fn record(&self, index: u8) -> Result<usize, FormatError> {
        if index >= self.count {
            return Err(FormatError::IndexOutOfRange {
                kind: self.kind,
                index,
                count: self.count,
            });
        }
        Ok(self.first + index as usize * self.stride)
    }
}

/// Validated scene blob. Cloning shares the underlying bytes.
#[derive(Debug, Clone)]
pub struct Scene {
    bytes: Arc<[u8]>,
    header: SceneHeader,
}

impl Scene {
    /// Validate and adopt a scene blob. Rejected blobs are returned as an
    /// error; callers decide what to fall back to.
    pub fn load(bytes: impl Into<Arc<[u8]>>) -> Result<Scene, FormatError> {
        let bytes = bytes.into();
        let header = SceneHeader::parse(&bytes).map_err(|e| {
            warn!("Rejecting scene blob of {} bytes: {}", bytes.len(), e);
            e
        })?;
        debug!(
            "Loaded scene: {} rooms, {}x{} map, {} messages",
            header.room_count, header.map_width, header.map_height, header.message_count
        );
        Ok(Scene { bytes, header })
    }

    /// The known-good scene compiled into the binary
    pub fn builtin() -> Scene {
        BUILTIN_SCENE.clone()
    }

    /// True if both scenes share the same underlying blob
    pub fn same_blob(&self, other: &Scene) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn view(&self) -> BlobView<'_> {
        BlobView::new(&self.bytes)
    }

    pub fn header(&self) -> &SceneHeader {
        &self.header
    }

    pub fn room_count(&self) -> u8 {
        self.header.room_count
    }

    pub fn map_width(&self) -> u8 {
        self.header.map_width
    }

    pub fn map_height(&self) -> u8 {
        self.header.map_height
    }

    pub fn start_room(&self) -> u8 {
        self.header.start_room
    }

    pub fn start_spawn(&self) -> u8 {
        self.header.start_spawn
    }

    /// Text of message `id`, or `None` if the id is beyond the table's count
    /// or the table itself is unreadable
    pub fn message(&self, id: u8) -> Option<&str> {
        let view = self.view();
        let table = RecordList::counted(
            &view,
            self.header.message_table,
            MESSAGE_ENTRY_SIZE,
            "message",
        )
        .ok()?;
        let entry = table.record(id).ok()?;
        let text_ofs = view.u16_at(entry).ok()?;
        view.text_at(text_ofs as usize).ok()
    }

    /// Number of entries in the message table
    pub fn message_count(&self) -> u8 {
        let view = self.view();
        RecordList::counted(&view, self.header.message_table, MESSAGE_ENTRY_SIZE, "message")
            .map(|t| t.count())
            .unwrap_or(0)
    }

    /// Room directory as a record list
    pub fn room_directory(&self) -> RecordList {
        RecordList::fixed(
            self.header.room_directory,
            self.header.room_count,
            ROOM_DIR_ENTRY_SIZE,
            "room",
        )
    }

    /// Resolve the four section offsets for a room
    pub fn room_offsets(&self, room: u8) -> Result<RoomOffsets, FormatError> {
        let base = self
            .room_directory()
            .record(room)
            .map_err(|_| FormatError::RoomOutOfRange {
                room,
                count: self.header.room_count,
            })?;
        let view = self.view();
        Ok(RoomOffsets {
            map: view.u16_at(base)?,
            spawns: view.u16_at(base + 2)?,
            exits: view.u16_at(base + 4)?,
            objects: view.u16_at(base + 6)?,
        })
    }

    pub fn room(&self, room: u8) -> Result<Room<'_>, FormatError> {
        let offsets = self.room_offsets(room)?;
        Ok(Room::with_offsets(self, room, offsets))
    }
}

/// One room directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomOffsets {
    pub map: u16,
    pub spawns: u16,
    pub exits: u16,
    pub objects: u16,
}

/// Tile coordinate inside a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnPoint {
    pub x: u8,
    pub y: u8,
}

/// Room edge an exit is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Up,
    Down,
    Other(u8),
}

impl Edge {
    pub fn from_byte(b: u8) -> Edge {
        match b {
            0 => Edge::Left,
            1 => Edge::Right,
            2 => Edge::Up,
            3 => Edge::Down,
            other => Edge::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Edge::Left => 0,
            Edge::Right => 1,
            Edge::Up => 2,
            Edge::Down => 3,
            Edge::Other(b) => b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub edge: Edge,
    pub room: u8,
    pub spawn: u8,
}

/// Player verbs, in object-record slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Look,
    Take,
    Use,
    Talk,
    Operate,
}

impl Verb {
    pub const ALL: [Verb; 5] = [Verb::Look, Verb::Take, Verb::Use, Verb::Talk, Verb::Operate];

    pub fn bit(self) -> u8 {
        1 << self.slot()
    }

    pub fn slot(self) -> usize {
        match self {
            Verb::Look => 0,
            Verb::Take => 1,
            Verb::Use => 2,
            Verb::Talk => 3,
            Verb::Operate => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Verb::Look => "look",
            Verb::Take => "take",
            Verb::Use => "use",
            Verb::Talk => "talk",
            Verb::Operate => "operate",
        }
    }

    pub fn from_name(name: &str) -> Option<Verb> {
        Verb::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

/// Object type tags known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Sign,
    Pickup,
    LockerKeypad,
    BreakerPanel,
    HatchPanel,
    ExitTrigger,
    NpcIntercom,
    Unknown(u8),
}

impl ObjectKind {
    pub fn from_byte(b: u8) -> ObjectKind {
        match b {
            1 => ObjectKind::Sign,
            2 => ObjectKind::Pickup,
            3 => ObjectKind::LockerKeypad,
            4 => ObjectKind::BreakerPanel,
            5 => ObjectKind::HatchPanel,
            6 => ObjectKind::ExitTrigger,
            7 => ObjectKind::NpcIntercom,
            other => ObjectKind::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ObjectKind::Sign => 1,
            ObjectKind::Pickup => 2,
            ObjectKind::LockerKeypad => 3,
            ObjectKind::BreakerPanel => 4,
            ObjectKind::HatchPanel => 5,
            ObjectKind::ExitTrigger => 6,
            ObjectKind::NpcIntercom => 7,
            ObjectKind::Unknown(b) => b,
        }
    }
}

/// Decoded 22-byte object record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord {
    pub x: u8,
    pub y: u8,
    pub kind: ObjectKind,
    /// Bit per [`Verb`]
    pub verbs: u8,
    pub params: [u8; 2],
    /// Condition-stream offset gating every verb; 0 always passes
    pub gate: u16,
    /// Action-stream offset per verb slot; 0 is a no-op
    pub actions: [u16; 5],
    /// Type-specific alternate scripts (keypad ok/bad and the like)
    pub alternates: [u16; 2],
}

impl ObjectRecord {
    pub fn decode(view: &BlobView, base: usize) -> Result<ObjectRecord, FormatError> {
        let mut actions = [0u16; 5];
        for (slot, ofs) in actions.iter_mut().enumerate() {
            *ofs = view.u16_at(base + OBJ_OFS_LOOK + slot * 2)?;
        }
        Ok(ObjectRecord {
            x: view.u8_at(base + OBJ_OFS_X)?,
            y: view.u8_at(base + OBJ_OFS_Y)?,
            kind: ObjectKind::from_byte(view.u8_at(base + OBJ_OFS_TYPE)?),
            verbs: view.u8_at(base + OBJ_OFS_VERBS)?,
            params: [view.u8_at(base + OBJ_OFS_P0)?, view.u8_at(base + OBJ_OFS_P1)?],
            gate: view.u16_at(base + OBJ_OFS_GATE)?,
            actions,
            alternates: [
                view.u16_at(base + OBJ_OFS_ALT0)?,
                view.u16_at(base + OBJ_OFS_ALT1)?,
            ],
        })
    }

    pub fn supports(&self, verb: Verb) -> bool {
        self.verbs & verb.bit() != 0
    }

    pub fn action(&self, verb: Verb) -> u16 {
        self.actions[verb.slot()]
    }
}

/// Resolved view of one room
#[derive(Debug, Clone, Copy)]
pub struct Room<'a> {
    scene: &'a Scene,
    id: u8,
    offsets: RoomOffsets,
}

impl<'a> Room<'a> {
    /// Room view over already-resolved directory offsets
    pub(crate) fn with_offsets(scene: &'a Scene, id: u8, offsets: RoomOffsets) -> Self {
        Room { scene, id, offsets }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn offsets(&self) -> RoomOffsets {
        self.offsets
    }

    /// Row-major tile grid, `map_width * map_height` bytes
    pub fn map(&self) -> Result<&'a [u8], FormatError> {
        let len = self.scene.map_width() as usize * self.scene.map_height() as usize;
        BlobView::new(self.scene.bytes()).slice(self.offsets.map as usize, len)
    }

    /// Tile id at (x, y), `None` if off-map
    pub fn tile_at(&self, x: u8, y: u8) -> Option<u8> {
        let (w, h) = (self.scene.map_width(), self.scene.map_height());
        if x >= w || y >= h {
            return None;
        }
        let map = self.map().ok()?;
        map.get(y as usize * w as usize + x as usize).copied()
    }

    pub fn spawn_list(&self) -> Result<RecordList, FormatError> {
        RecordList::counted(&self.scene.view(), self.offsets.spawns, SPAWN_RECORD_SIZE, "spawn")
    }

    pub fn exit_list(&self) -> Result<RecordList, FormatError> {
        RecordList::counted(&self.scene.view(), self.offsets.exits, EXIT_RECORD_SIZE, "exit")
    }

    pub fn object_list(&self) -> Result<RecordList, FormatError> {
        RecordList::counted(&self.scene.view(), self.offsets.objects, OBJECT_RECORD_SIZE, "object")
    }

    pub fn spawn_count(&self) -> u8 {
        self.spawn_list().map(|l| l.count()).unwrap_or(0)
    }

    pub fn exit_count(&self) -> u8 {
        self.exit_list().map(|l| l.count()).unwrap_or(0)
    }

    pub fn object_count(&self) -> u8 {
        self.object_list().map(|l| l.count()).unwrap_or(0)
    }

    pub fn spawn(&self, index: u8) -> Result<SpawnPoint, FormatError> {
        let base = self.spawn_list()?.record(index)?;
        let view = self.scene.view();
        Ok(SpawnPoint {
            x: view.u8_at(base)?,
            y: view.u8_at(base + 1)?,
        })
    }

    pub fn exit(&self, index: u8) -> Result<Exit, FormatError> {
        let base = self.exit_list()?.record(index)?;
        let view = self.scene.view();
        Ok(Exit {
            edge: Edge::from_byte(view.u8_at(base)?),
            room: view.u8_at(base + 1)?,
            spawn: view.u8_at(base + 2)?,
        })
    }

    /// Blob offset of object record `index`
    pub fn object_base(&self, index: u8) -> Result<usize, FormatError> {
        self.object_list()?.record(index)
    }

    pub fn object(&self, index: u8) -> Result<ObjectRecord, FormatError> {
        let base = self.object_base(index)?;
        ObjectRecord::decode(&self.scene.view(), base)
    }

    /// First exit attached to `edge`
    pub fn exit_for(&self, edge: Edge) -> Option<Exit> {
        (0..self.exit_count())
            .filter_map(|i| self.exit(i).ok())
            .find(|e| e.edge == edge)
    }

    /// Index of the first object standing on (x, y)
    pub fn object_at(&self, x: u8, y: u8) -> Option<u8> {
        (0..self.object_count()).find(|&i| {
            self.object(i)
                .map(|o| o.x == x && o.y == y)
                .unwrap_or(false)
        })
    }
}
