//! Player grid movement
//!
//! One tile per step. Stepping off the map edge takes the room's exit for
//! that edge if there is one; solid tiles block movement.

use log::{debug, warn};

use crate::navigator::RoomNavigator;
use crate::scene::{Edge, Exit, Scene, SpawnPoint};
use crate::tileset::Tileset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn edge(self) -> Edge {
        match self {
            Direction::Left => Edge::Left,
            Direction::Right => Edge::Right,
            Direction::Up => Edge::Up,
            Direction::Down => Edge::Down,
        }
    }

    fn delta(self) -> (i16, i16) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { x: u8, y: u8 },
    /// Solid tile in the way
    Blocked,
    /// At the map edge with no exit there
    NoExit(Edge),
    /// Took an exit into another room
    Exited(Exit),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Player {
    pub x: u8,
    pub y: u8,
}

impl Player {
    /// Move to the navigator's recorded spawn, or (0, 0) if it doesn't resolve
    pub fn place_at_spawn(&mut self, scene: &Scene, nav: &RoomNavigator) {
        let SpawnPoint { x, y } = nav.entry_point(scene).unwrap_or_else(|| {
            warn!(
                "Spawn {:?} not found in room {:?}, placing at origin",
                nav.spawn_id(),
                nav.room_id()
            );
            SpawnPoint::default()
        });
        self.x = x;
        self.y = y;
    }

    pub fn step(
        &mut self,
        dir: Direction,
        scene: &Scene,
        tileset: &Tileset,
        nav: &mut RoomNavigator,
    ) -> StepOutcome {
        let (w, h) = (scene.map_width() as i16, scene.map_height() as i16);
        let (dx, dy) = dir.delta();
        let nx = self.x as i16 + dx;
        let ny = self.y as i16 + dy;

        if nx < 0 || ny < 0 || nx >= w || ny >= h {
            return self.try_exit(dir.edge(), scene, nav);
        }

        let (nx, ny) = (nx as u8, ny as u8);
        if is_solid(scene, tileset, nav, nx, ny) {
            return StepOutcome::Blocked;
        }
        self.x = nx;
        self.y = ny;
        StepOutcome::Moved { x: nx, y: ny }
    }

    fn try_exit(&mut self, edge: Edge, scene: &Scene, nav: &mut RoomNavigator) -> StepOutcome {
        let Some(exit) = nav.room(scene).and_then(|r| r.exit_for(edge)) else {
            return StepOutcome::NoExit(edge);
        };
        if nav.load(scene, exit.room, exit.spawn).is_err() {
            return StepOutcome::NoExit(edge);
        }
        self.place_at_spawn(scene, nav);
        debug!(
            "Exited {:?} into room {} at ({}, {})",
            edge, exit.room, self.x, self.y
        );
        StepOutcome::Exited(exit)
    }
}

/// Off-map and unreadable maps count as solid
pub fn is_solid(scene: &Scene, tileset: &Tileset, nav: &RoomNavigator, x: u8, y: u8) -> bool {
    match nav.room(scene).and_then(|r| r.tile_at(x, y)) {
        Some(tile) => tileset.is_solid(tile),
        None => true,
    }
}
