//! In-memory encoders for scene and tileset blobs
//!
//! These produce exactly the layouts the codecs read. They back the
//! built-in fallback scene and the test fixtures; they are not a level
//! compiler and do no name resolution.

use crate::bytecode::{Action, Condition};
use crate::header::{SCENE_HEADER_SIZE, SCENE_MAGIC, SCENE_VERSION};
use crate::scene::{Exit, ObjectKind, ObjectRecord, SpawnPoint, Verb, ROOM_DIR_ENTRY_SIZE};
use crate::tileset::{TileRecord, TILESET_HEADER_SIZE, TILESET_MAGIC, TILESET_RECORD_SIZE, TILESET_VERSION};

fn push_u16(out: &mut Vec<u8>, v: usize) {
    debug_assert!(v <= u16::MAX as usize, "blob offset {v:#x} exceeds 16 bits");
    out.extend_from_slice(&(v as u16).to_le_bytes());
}

fn put_u16(out: &mut [u8], at: usize, v: usize) {
    debug_assert!(v <= u16::MAX as usize, "blob offset {v:#x} exceeds 16 bits");
    out[at..at + 2].copy_from_slice(&(v as u16).to_le_bytes());
}

/// One room's contents before layout
#[derive(Debug, Clone, Default)]
pub struct RoomDraft {
    pub map: Vec<u8>,
    pub spawns: Vec<SpawnPoint>,
    pub exits: Vec<Exit>,
    pub objects: Vec<ObjectRecord>,
}

impl RoomDraft {
    /// A room filled with `tile`
    pub fn filled(width: u8, height: u8, tile: u8) -> Self {
        RoomDraft {
            map: vec![tile; width as usize * height as usize],
            ..Default::default()
        }
    }

    pub fn spawn(mut self, x: u8, y: u8) -> Self {
        self.spawns.push(SpawnPoint { x, y });
        self
    }

    pub fn exit(mut self, exit: Exit) -> Self {
        self.exits.push(exit);
        self
    }

    pub fn object(mut self, object: ObjectRecord) -> Self {
        self.objects.push(object);
        self
    }

    pub fn set_tile(mut self, width: u8, x: u8, y: u8, tile: u8) -> Self {
        let i = y as usize * width as usize + x as usize;
        if let Some(t) = self.map.get_mut(i) {
            *t = tile;
        }
        self
    }
}

/// Object record with no verbs and no scripts
pub fn object(kind: ObjectKind, x: u8, y: u8) -> ObjectRecord {
    ObjectRecord {
        x,
        y,
        kind,
        verbs: 0,
        params: [0, 0],
        gate: 0,
        actions: [0; 5],
        alternates: [0; 2],
    }
}

/// Enable `verb` on `obj` and point it at `action`
pub fn with_verb(mut obj: ObjectRecord, verb: Verb, action: u16) -> ObjectRecord {
    obj.verbs |= verb.bit();
    obj.actions[verb.slot()] = action;
    obj
}

#[derive(Debug, Clone)]
pub struct SceneWriter {
    map_width: u8,
    map_height: u8,
    flag_count: u8,
    var_count: u8,
    item_count: u8,
    start_room: u8,
    start_spawn: u8,
    rooms: Vec<RoomDraft>,
    conditions: Vec<u8>,
    actions: Vec<u8>,
    messages: Vec<String>,
}

impl SceneWriter {
    pub fn new(map_width: u8, map_height: u8) -> Self {
        // Offset 0 in either stream is the "always"/"nothing" shortcut, so
        // each stream opens with a bare END and real scripts start after it.
        SceneWriter {
            map_width,
            map_height,
            flag_count: 0,
            var_count: 0,
            item_count: 0,
            start_room: 0,
            start_spawn: 0,
            rooms: Vec::new(),
            conditions: Condition::End.encode().bytes().to_vec(),
            actions: Action::End.encode().bytes().to_vec(),
            messages: Vec::new(),
        }
    }

    pub fn counts(mut self, flags: u8, vars: u8, items: u8) -> Self {
        self.flag_count = flags;
        self.var_count = vars;
        self.item_count = items;
        self
    }

    pub fn start(mut self, room: u8, spawn: u8) -> Self {
        self.start_room = room;
        self.start_spawn = spawn;
        self
    }

    pub fn message(&mut self, text: &str) -> u8 {
        self.messages.push(text.to_owned());
        (self.messages.len() - 1) as u8
    }

    /// Append a condition script (END is added) and return its offset
    pub fn condition(&mut self, ops: &[Condition]) -> u16 {
        let ofs = self.conditions.len() as u16;
        for op in ops {
            self.conditions.extend_from_slice(&op.encode().bytes());
        }
        self.conditions.extend_from_slice(&Condition::End.encode().bytes());
        ofs
    }

    /// Append raw condition bytes with no END added
    pub fn raw_condition(&mut self, bytes: &[u8]) -> u16 {
        let ofs = self.conditions.len() as u16;
        self.conditions.extend_from_slice(bytes);
        ofs
    }

    /// Append an action script (END is added) and return its offset
    pub fn action(&mut self, ops: &[Action]) -> u16 {
        let ofs = self.actions.len() as u16;
        for op in ops {
            self.actions.extend_from_slice(&op.encode().bytes());
        }
        self.actions.extend_from_slice(&Action::End.encode().bytes());
        ofs
    }

    /// Append raw action bytes with no END added
    pub fn raw_action(&mut self, bytes: &[u8]) -> u16 {
        let ofs = self.actions.len() as u16;
        self.actions.extend_from_slice(bytes);
        ofs
    }

    pub fn room(&mut self, room: RoomDraft) -> u8 {
        self.rooms.push(room);
        (self.rooms.len() - 1) as u8
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut blob = vec![0u8; SCENE_HEADER_SIZE];

        let room_dir = blob.len();
        blob.resize(room_dir + self.rooms.len() * ROOM_DIR_ENTRY_SIZE, 0);

        for (i, room) in self.rooms.iter().enumerate() {
            let ofs_map = blob.len();
            blob.extend_from_slice(&room.map);

            let ofs_spawns = blob.len();
            blob.push(room.spawns.len() as u8);
            for s in &room.spawns {
                blob.extend_from_slice(&[s.x, s.y]);
            }

            let ofs_exits = blob.len();
            blob.push(room.exits.len() as u8);
            for e in &room.exits {
                blob.extend_from_slice(&[e.edge.to_byte(), e.room, e.spawn]);
            }

            let ofs_objects = blob.len();
            blob.push(room.objects.len() as u8);
            for o in &room.objects {
                blob.extend_from_slice(&[o.x, o.y, o.kind.to_byte(), o.verbs, o.params[0], o.params[1]]);
                push_u16(&mut blob, o.gate as usize);
                for a in o.actions {
                    push_u16(&mut blob, a as usize);
                }
                for a in o.alternates {
                    push_u16(&mut blob, a as usize);
                }
            }

            let entry = room_dir + i * ROOM_DIR_ENTRY_SIZE;
            put_u16(&mut blob, entry, ofs_map);
            put_u16(&mut blob, entry + 2, ofs_spawns);
            put_u16(&mut blob, entry + 4, ofs_exits);
            put_u16(&mut blob, entry + 6, ofs_objects);
        }

        let cond_stream = blob.len();
        blob.extend_from_slice(&self.conditions);
        let act_stream = blob.len();
        blob.extend_from_slice(&self.actions);

        let msg_table = blob.len();
        blob.push(self.messages.len() as u8);
        let slots = blob.len();
        blob.resize(slots + self.messages.len() * 2, 0);
        for (i, text) in self.messages.iter().enumerate() {
            let at = blob.len();
            put_u16(&mut blob, slots + i * 2, at);
            blob.extend_from_slice(text.as_bytes());
            blob.push(0);
        }

        blob[..4].copy_from_slice(&SCENE_MAGIC);
        blob[4] = SCENE_VERSION;
        blob[5] = self.rooms.len() as u8;
        blob[6] = self.map_width;
        blob[7] = self.map_height;
        blob[8] = self.flag_count;
        blob[9] = self.var_count;
        blob[10] = self.item_count;
        blob[11] = self.messages.len() as u8;
        blob[12] = self.start_room;
        blob[13] = self.start_spawn;
        put_u16(&mut blob, 14, room_dir);
        put_u16(&mut blob, 16, cond_stream);
        put_u16(&mut blob, 18, act_stream);
        put_u16(&mut blob, 20, msg_table);
        blob
    }
}

#[derive(Debug, Clone)]
pub struct TilesetWriter {
    tile_width: u8,
    tile_height: u8,
    palette: [u8; 3],
    records: Vec<TileRecord>,
}

impl TilesetWriter {
    pub fn new(tile_width: u8, tile_height: u8) -> Self {
        TilesetWriter {
            tile_width,
            tile_height,
            palette: [0; 3],
            records: Vec::new(),
        }
    }

    /// Background, multicolor 1, multicolor 2
    pub fn palette(mut self, background: u8, mc1: u8, mc2: u8) -> Self {
        self.palette = [background, mc1, mc2];
        self
    }

    pub fn tile(mut self, record: TileRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(TILESET_HEADER_SIZE + self.records.len() * TILESET_RECORD_SIZE);
        blob.extend_from_slice(&TILESET_MAGIC);
        blob.extend_from_slice(&[
            TILESET_VERSION,
            self.tile_width,
            self.tile_height,
            self.records.len() as u8,
            TILESET_RECORD_SIZE as u8,
        ]);
        push_u16(&mut blob, TILESET_HEADER_SIZE);
        push_u16(&mut blob, 0);
        blob.extend_from_slice(&self.palette);
        blob.push(0);
        for r in &self.records {
            blob.push(r.id);
            blob.extend_from_slice(&r.chars);
            blob.push(r.color_mode);
            blob.extend_from_slice(&r.colors);
            push_u16(&mut blob, r.flags.bits() as usize);
        }
        blob
    }
}
