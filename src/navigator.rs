//! Current-room cursor
//!
//! Holds the active room id, its advisory spawn id, and the four directory
//! offsets resolved when the room was loaded. There is no unload: once a
//! room is active the navigator always reflects the most recent load.

use log::{debug, warn};

use crate::error::FormatError;
use crate::scene::{Room, RoomOffsets, Scene, SpawnPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRoom {
    pub room: u8,
    pub spawn: u8,
    pub offsets: RoomOffsets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigatorState {
    #[default]
    NoRoom,
    Active(ActiveRoom),
}

#[derive(Debug, Clone, Default)]
pub struct RoomNavigator {
    state: NavigatorState,
}

impl RoomNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    /// Resolve `room` from the scene directory and make it active. A room
    /// id outside the directory is refused and the previous room is kept.
    pub fn load(&mut self, scene: &Scene, room: u8, spawn: u8) -> Result<RoomOffsets, FormatError> {
        let offsets = scene.room_offsets(room).map_err(|e| {
            warn!("Cannot load room {}: {}", room, e);
            e
        })?;
        debug!(
            "Room {} active (spawn {}): map {:#06x} spawns {:#06x} exits {:#06x} objects {:#06x}",
            room, spawn, offsets.map, offsets.spawns, offsets.exits, offsets.objects
        );
        self.state = NavigatorState::Active(ActiveRoom {
            room,
            spawn,
            offsets,
        });
        Ok(offsets)
    }

    pub fn active(&self) -> Option<ActiveRoom> {
        match self.state {
            NavigatorState::Active(a) => Some(a),
            NavigatorState::NoRoom => None,
        }
    }

    pub fn room_id(&self) -> Option<u8> {
        self.active().map(|a| a.room)
    }

    pub fn spawn_id(&self) -> Option<u8> {
        self.active().map(|a| a.spawn)
    }

    /// View of the active room. `scene` must be the scene it was loaded from.
    pub fn room<'a>(&self, scene: &'a Scene) -> Option<Room<'a>> {
        self.active()
            .map(|a| Room::with_offsets(scene, a.room, a.offsets))
    }

    /// Where the player appears: the recorded spawn, resolved on demand
    pub fn entry_point(&self, scene: &Scene) -> Option<SpawnPoint> {
        let spawn = self.spawn_id()?;
        self.room(scene)?.spawn(spawn).ok()
    }
}
