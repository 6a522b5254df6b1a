//! Game session: the one owner of all run-time state
//!
//! Holds the active scene and tileset, puzzle state, inventory, room
//! navigator, player position and the text display. Scripts run against a
//! [`ScriptContext`] that borrows the mutable parts while the scene stays
//! shared.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::FormatError;
use crate::interpreter::{self, ActionOutcome, ScriptHost};
use crate::inventory::{Inventory, DEFAULT_CAPACITY};
use crate::navigator::RoomNavigator;
use crate::player::{Direction, Player, StepOutcome};
use crate::puzzle::PuzzleState;
use crate::scene::{ObjectKind, ObjectRecord, Room, Scene, Verb};
use crate::textbox::{TextSink, Textbox};
use crate::tileset::Tileset;

/// Result of poking an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The object's verb mask doesn't include this verb
    Unsupported,
    /// The object's gate condition failed
    Gated,
    /// The object is not the type this interaction needs
    WrongKind(ObjectKind),
    /// The script ran
    Ran(ActionOutcome),
}

/// Borrowed view of the session that scripts act on
pub struct ScriptContext<'s, T: TextSink> {
    pub scene: &'s Scene,
    pub puzzle: &'s mut PuzzleState,
    pub inventory: &'s mut Inventory,
    pub navigator: &'s mut RoomNavigator,
    pub player: &'s mut Player,
    pub textbox: &'s mut T,
}

impl<'s, T: TextSink> ScriptHost for ScriptContext<'s, T> {
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
        let text = self.scene.message(id);
        if text.is_none() {
            debug!("Message {} not in table", id);
        }
        if let Err(e) = self.textbox.show(text) {
            warn!("Cannot show message {}: {}", id, e);
        }
    }

    fn transition(&mut self, room: u8, spawn: u8) {
        if self.navigator.load(self.scene, room, spawn).is_ok() {
            self.player.place_at_spawn(self.scene, self.navigator);
        }
    }

    fn play_sfx(&mut self, id: u8) {
        debug!("SFX {} (no audio)", id);
    }
}

pub struct GameSession<T: TextSink = Textbox> {
    scene: Scene,
    tileset: Tileset,
    puzzle: PuzzleState,
    inventory: Inventory,
    navigator: RoomNavigator,
    player: Player,
    textbox: T,
}

impl GameSession<Textbox> {
    /// Session on the built-in scene and tileset with a headless textbox
    pub fn builtin() -> Self {
        GameSession::new(Scene::builtin(), Tileset::builtin(), Textbox::new())
    }
}

impl<T: TextSink> GameSession<T> {
    pub fn new(scene: Scene, tileset: Tileset, textbox: T) -> Self {
        GameSession::with_inventory_capacity(scene, tileset, textbox, DEFAULT_CAPACITY)
    }

    pub fn with_inventory_capacity(
        scene: Scene,
        tileset: Tileset,
        textbox: T,
        capacity: usize,
    ) -> Self {
        let mut session = GameSession {
            puzzle: PuzzleState::for_scene(scene.header()),
            scene,
            tileset,
            inventory: Inventory::with_capacity(capacity),
            navigator: RoomNavigator::new(),
            player: Player::default(),
            textbox,
        };
        session.start();
        session
    }

    /// Reset puzzle state and inventory, then enter the start room
    pub fn start(&mut self) {
        self.puzzle = PuzzleState::for_scene(self.scene.header());
        self.inventory.clear();
        // offsets from a previous scene mean nothing in this one
        self.navigator = RoomNavigator::new();
        let (room, spawn) = (self.scene.start_room(), self.scene.start_spawn());
        if self.navigator.load(&self.scene, room, spawn).is_err() {
            warn!("Start room {} missing, trying room 0", room);
            if let Err(e) = self.navigator.load(&self.scene, 0, 0) {
                warn!("No playable room in scene: {}", e);
            }
        }
        self.player.place_at_spawn(&self.scene, &self.navigator);
        info!(
            "Session started in room {:?} at ({}, {})",
            self.navigator.room_id(),
            self.player.x,
            self.player.y
        );
    }

    /// Validate and switch to a new scene blob. A rejected blob leaves the
    /// current scene (and all state) untouched.
    pub fn load_scene(&mut self, bytes: impl Into<Arc<[u8]>>) -> Result<(), FormatError> {
        let scene = Scene::load(bytes)?;
        self.scene = scene;
        self.start();
        Ok(())
    }

    /// Switch tile metadata. A rejected blob leaves the current tileset in
    /// place.
    pub fn load_tileset(&mut self, bytes: impl Into<Arc<[u8]>>) -> Result<(), FormatError> {
        let tileset = Tileset::load(bytes).map_err(|e| {
            warn!("Tileset rejected, keeping current one: {}", e);
            e
        })?;
        self.tileset = tileset;
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut PuzzleState {
        &mut self.puzzle
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn navigator(&self) -> &RoomNavigator {
        &self.navigator
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn textbox(&self) -> &T {
        &self.textbox
    }

    pub fn textbox_mut(&mut self) -> &mut T {
        &mut self.textbox
    }

    pub fn current_room(&self) -> Option<Room<'_>> {
        self.navigator.room(&self.scene)
    }

    /// Load a room directly, placing the player at `spawn`
    pub fn enter_room(&mut self, room: u8, spawn: u8) -> Result<(), FormatError> {
        self.navigator.load(&self.scene, room, spawn)?;
        self.player.place_at_spawn(&self.scene, &self.navigator);
        Ok(())
    }

    pub fn context(&mut self) -> ScriptContext<'_, T> {
        ScriptContext {
            scene: &self.scene,
            puzzle: &mut self.puzzle,
            inventory: &mut self.inventory,
            navigator: &mut self.navigator,
            player: &mut self.player,
            textbox: &mut self.textbox,
        }
    }

    pub fn evaluate(&mut self, cond_offset: u16) -> bool {
        let ctx = self.context();
        interpreter::evaluate(ctx.scene, &ctx, cond_offset)
    }

    pub fn execute(&mut self, act_offset: u16) -> ActionOutcome {
        let mut ctx = self.context();
        let scene = ctx.scene;
        interpreter::execute(scene, &mut ctx, act_offset)
    }

    pub fn step(&mut self, dir: Direction) -> StepOutcome {
        self.player
            .step(dir, &self.scene, &self.tileset, &mut self.navigator)
    }

    /// Object record `index` in the current room
    pub fn object(&self, index: u8) -> Result<ObjectRecord, FormatError> {
        match self.current_room() {
            Some(room) => room.object(index),
            None => Err(FormatError::IndexOutOfRange {
                kind: "object",
                index,
                count: 0,
            }),
        }
    }

    /// Index of the object under the player, if any
    pub fn object_here(&self) -> Option<u8> {
        self.current_room()?.object_at(self.player.x, self.player.y)
    }

    /// Apply `verb` to object `index`: check the verb mask, then the gate,
    /// then run the verb's script
    pub fn interact(&mut self, index: u8, verb: Verb) -> Result<Interaction, FormatError> {
        let obj = self.object(index)?;
        if !obj.supports(verb) {
            return Ok(Interaction::Unsupported);
        }
        self.gated(&obj, obj.action(verb))
    }

    /// Run alternate script `slot` (0 or 1) of object `index`, behind its gate
    pub fn run_alternate(&mut self, index: u8, slot: usize) -> Result<Interaction, FormatError> {
        let obj = self.object(index)?;
        let Some(&ofs) = obj.alternates.get(slot) else {
            return Err(FormatError::IndexOutOfRange {
                kind: "alternate",
                index: slot.min(u8::MAX as usize) as u8,
                count: 2,
            });
        };
        self.gated(&obj, ofs)
    }

    /// Try a code on a locker keypad. The code is `p0 * 100 + p1`; a match
    /// runs alternate 0, anything else alternate 1.
    pub fn enter_keypad_code(&mut self, index: u8, code: u16) -> Result<Interaction, FormatError> {
        let obj = self.object(index)?;
        if obj.kind != ObjectKind::LockerKeypad {
            return Ok(Interaction::WrongKind(obj.kind));
        }
        let expected = obj.params[0] as u16 * 100 + obj.params[1] as u16;
        let slot = if code == expected { 0 } else { 1 };
        debug!("Keypad {} entered {:03}, slot {}", index, code, slot);
        self.gated(&obj, obj.alternates[slot])
    }

    /// Set a breaker panel's switches. The bits go into variable `p0`; if
    /// they equal `p1` alternate 0 runs, otherwise alternate 1.
    pub fn set_breakers(&mut self, index: u8, bits: u8) -> Result<Interaction, FormatError> {
        let obj = self.object(index)?;
        if obj.kind != ObjectKind::BreakerPanel {
            return Ok(Interaction::WrongKind(obj.kind));
        }
        if !self.evaluate(obj.gate) {
            return Ok(Interaction::Gated);
        }
        let bits = bits & 0b111;
        self.puzzle.var_set(obj.params[0], bits);
        let slot = if bits == obj.params[1] { 0 } else { 1 };
        Ok(Interaction::Ran(self.execute(obj.alternates[slot])))
    }

    fn gated(&mut self, obj: &ObjectRecord, act_offset: u16) -> Result<Interaction, FormatError> {
        if !self.evaluate(obj.gate) {
            return Ok(Interaction::Gated);
        }
        Ok(Interaction::Ran(self.execute(act_offset)))
    }
}
