// Test utilities: a recording script host and small scene fixtures
use crate::bytecode::{Action, Condition};
use crate::interpreter::ScriptHost;
use crate::inventory::Inventory;
use crate::puzzle::PuzzleState;
use crate::scene::{Edge, Exit, Scene};
use crate::writer::{RoomDraft, SceneWriter};

/// Externally visible effects, in the order scripts produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Message(u8),
    Sfx(u8),
    Transition(u8, u8),
}

pub struct MockHost {
    pub puzzle: PuzzleState,
    pub inventory: Inventory,
    pub effects: Vec<Effect>,
}

impl MockHost {
    pub fn new(flags: u8, vars: u8) -> Self {
        MockHost {
            puzzle: PuzzleState::new(flags, vars),
            inventory: Inventory::default(),
            effects: Vec::new(),
        }
    }
}

impl ScriptHost for MockHost {
    fn flag(&self, id: u8) -> bool {
        self.puzzle.flag_get(id)
    }

    fn set_flag(&mut self, id: u8) {
        self.puzzle.flag_set(id);
    }

    fn clear_flag(&mut self, id: u8) {
        self.puzzle.flag_clear(id);
    }

    fn var(&self, id: u8) -> u8 {
        self.puzzle.var_get(id)
    }

    fn set_var(&mut self, id: u8, value: u8) {
        self.puzzle.var_set(id, value);
    }

    fn has_item(&self, item: u8) -> bool {
        self.inventory.has(item)
    }

    fn give_item(&mut self, item: u8) {
        self.inventory.add(item);
    }

    fn take_item(&mut self, item: u8) {
        self.inventory.remove(item);
    }

    fn show_message(&mut self, id: u8) {
        self.effects.push(Effect::Message(id));
    }

    fn transition(&mut self, room: u8, spawn: u8) {
        self.effects.push(Effect::Transition(room, spawn));
    }

    fn play_sfx(&mut self, id: u8) {
        self.effects.push(Effect::Sfx(id));
    }
}

/// One empty 4x3 room plus whatever scripts the caller adds
pub fn script_scene(build: impl FnOnce(&mut SceneWriter)) -> Scene {
    let mut w = SceneWriter::new(4, 3).counts(16, 8, 8);
    build(&mut w);
    w.room(RoomDraft::filled(4, 3, 0).spawn(0, 0));
    Scene::load(w.finish()).unwrap()
}

/// Scene holding a single condition script; returns its offset
pub fn with_condition(ops: &[Condition]) -> (Scene, u16) {
    let mut ofs = 0;
    let scene = script_scene(|w| ofs = w.condition(ops));
    (scene, ofs)
}

/// Scene holding a single action script; returns its offset
pub fn with_action(ops: &[Action]) -> (Scene, u16) {
    let mut ofs = 0;
    let scene = script_scene(|w| ofs = w.action(ops));
    (scene, ofs)
}

/// Three rooms in a row; room 0's left edge leads to room 2 spawn 1
pub fn three_rooms() -> Scene {
    let mut w = SceneWriter::new(5, 4).counts(8, 4, 4);
    w.room(
        RoomDraft::filled(5, 4, 0)
            .spawn(2, 2)
            .exit(Exit {
                edge: Edge::Left,
                room: 2,
                spawn: 1,
            }),
    );
    w.room(RoomDraft::filled(5, 4, 1).spawn(0, 0));
    w.room(
        RoomDraft::filled(5, 4, 2)
            .spawn(0, 1)
            .spawn(4, 3)
            .exit(Exit {
                edge: Edge::Right,
                room: 0,
                spawn: 0,
            }),
    );
    Scene::load(w.finish()).unwrap()
}
