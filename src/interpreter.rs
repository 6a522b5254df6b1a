//! Condition evaluator and action executor
//!
//! Both are straight-line scans: no jumps, one triple per step, stopping at
//! `END`. Each scan is a small state machine so fail-closed endings
//! (unknown opcode, running off the blob) are explicit states rather than a
//! default branch.

use log::{debug, warn};

use crate::blob::BlobView;
use crate::bytecode::{Action, Condition, Triple, TRIPLE_SIZE};
use crate::error::FormatError;
use crate::scene::Scene;

/// Everything a script can observe or change
pub trait ScriptHost {
    fn flag(&self, id: u8) -> bool;
    fn set_flag(&mut self, id: u8);
    fn clear_flag(&mut self, id: u8);
    fn var(&self, id: u8) -> u8;
    fn set_var(&mut self, id: u8, value: u8);
    fn has_item(&self, item: u8) -> bool;
    fn give_item(&mut self, item: u8);
    fn take_item(&mut self, item: u8);
    /// Resolve message `id` and hand it to the text display
    fn show_message(&mut self, id: u8);
    /// Load `room` and record `spawn` as the entry point
    fn transition(&mut self, room: u8, spawn: u8);
    /// Reserved; scripts may emit it but nothing plays yet
    fn play_sfx(&mut self, _id: u8) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    Passed,
    Failed,
    Stopped,
}

/// Why an action scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Offset 0: nothing ran
    Skipped,
    /// Reached `END`
    Finished,
    /// Ran a `TRANSITION`; the rest of the stream was not scanned
    Transitioned { room: u8, spawn: u8 },
    /// Hit an opcode outside the action vocabulary
    UnknownOpcode { op: u8, offset: usize },
    /// Stream ran off the end of the blob without an `END`
    Truncated(FormatError),
}

/// Fetches successive triples from one stream position
#[derive(Debug, Clone)]
struct Cursor<'a> {
    view: BlobView<'a>,
    pc: usize,
}

impl<'a> Cursor<'a> {
    fn new(scene: &'a Scene, stream_base: u16, offset: u16) -> Self {
        Cursor {
            view: scene.view(),
            pc: stream_base as usize + offset as usize,
        }
    }

    fn fetch(&mut self) -> Result<(usize, Triple), FormatError> {
        let at = self.pc;
        let t = Triple::read(&self.view, at)?;
        self.pc += TRIPLE_SIZE;
        Ok((at, t))
    }
}

/// In-progress walk over a condition stream
#[derive(Debug, Clone)]
pub struct ConditionScan<'a> {
    cursor: Cursor<'a>,
    state: ScanState,
}

impl<'a> ConditionScan<'a> {
    pub fn new(scene: &'a Scene, cond_offset: u16) -> Self {
        let state = if cond_offset == 0 {
            ScanState::Passed
        } else {
            ScanState::Scanning
        };
        ConditionScan {
            cursor: Cursor::new(scene, scene.header().condition_stream, cond_offset),
            state,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Evaluate one predicate
    pub fn step<H: ScriptHost + ?Sized>(&mut self, host: &H) -> ScanState {
        if self.state != ScanState::Scanning {
            return self.state;
        }
        let (at, triple) = match self.cursor.fetch() {
            Ok(t) => t,
            Err(e) => {
                warn!("Condition stream ran off the blob: {}", e);
                self.state = ScanState::Failed;
                return self.state;
            }
        };
        let cond = Condition::from(triple);
        let holds = match cond {
            Condition::End => {
                self.state = ScanState::Passed;
                return self.state;
            }
            Condition::True => true,
            Condition::FlagSet(f) => host.flag(f),
            Condition::FlagClear(f) => !host.flag(f),
            Condition::HasItem(i) => host.has_item(i),
            Condition::VarEq(v, val) => host.var(v) == val,
            Condition::Unknown(op) => {
                warn!("Unknown condition opcode {:#04x} at {:#06x}", op, at);
                false
            }
        };
        if !holds {
            debug!("Condition {} failed at {:#06x}", cond, at);
            self.state = ScanState::Failed;
        }
        self.state
    }

    pub fn run<H: ScriptHost + ?Sized>(mut self, host: &H) -> ScanState {
        while self.state == ScanState::Scanning {
            self.step(host);
        }
        self.state
    }
}

/// In-progress walk over an action stream
#[derive(Debug, Clone)]
pub struct ActionScan<'a> {
    cursor: Cursor<'a>,
    state: ScanState,
    outcome: ActionOutcome,
}

impl<'a> ActionScan<'a> {
    pub fn new(scene: &'a Scene, act_offset: u16) -> Self {
        let (state, outcome) = if act_offset == 0 {
            (ScanState::Passed, ActionOutcome::Skipped)
        } else {
            (ScanState::Scanning, ActionOutcome::Finished)
        };
        ActionScan {
            cursor: Cursor::new(scene, scene.header().action_stream, act_offset),
            state,
            outcome,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Perform one action
    pub fn step<H: ScriptHost + ?Sized>(&mut self, host: &mut H) -> ScanState {
        if self.state != ScanState::Scanning {
            return self.state;
        }
        let (at, triple) = match self.cursor.fetch() {
            Ok(t) => t,
            Err(e) => {
                warn!("Action stream ran off the blob: {}", e);
                self.stop(ActionOutcome::Truncated(e));
                return self.state;
            }
        };
        match Action::from(triple) {
            Action::End => self.state = ScanState::Passed,
            Action::ShowMessage(m) => host.show_message(m),
            Action::SetFlag(f) => host.set_flag(f),
            Action::ClearFlag(f) => host.clear_flag(f),
            Action::GiveItem(i) => host.give_item(i),
            Action::TakeItem(i) => host.take_item(i),
            Action::SetVar(v, val) => host.set_var(v, val),
            Action::Sfx(n) => host.play_sfx(n),
            Action::Transition { room, spawn } => {
                debug!("Transition to room {} spawn {} at {:#06x}", room, spawn, at);
                host.transition(room, spawn);
                // room state is stale after a reload; trailing opcodes never run
                self.stop(ActionOutcome::Transitioned { room, spawn });
            }
            Action::Unknown(op) => {
                warn!("Unknown action opcode {:#04x} at {:#06x}", op, at);
                self.stop(ActionOutcome::UnknownOpcode { op, offset: at });
            }
        }
        self.state
    }

    fn stop(&mut self, outcome: ActionOutcome) {
        self.state = ScanState::Stopped;
        self.outcome = outcome;
    }

    pub fn run<H: ScriptHost + ?Sized>(mut self, host: &mut H) -> ActionOutcome {
        while self.state == ScanState::Scanning {
            self.step(host);
        }
        self.outcome
    }
}

/// True if every predicate at `cond_offset` holds. Offset 0 always passes.
pub fn evaluate<H: ScriptHost + ?Sized>(scene: &Scene, host: &H, cond_offset: u16) -> bool {
    ConditionScan::new(scene, cond_offset).run(host) == ScanState::Passed
}

/// Run the actions at `act_offset`. Offset 0 does nothing.
pub fn execute<H: ScriptHost + ?Sized>(
    scene: &Scene,
    host: &mut H,
    act_offset: u16,
) -> ActionOutcome {
    ActionScan::new(scene, act_offset).run(host)
}

/// Decode a condition script up to and including its `END`
pub fn disassemble_conditions(scene: &Scene, cond_offset: u16) -> Result<Vec<Condition>, FormatError> {
    let mut cursor = Cursor::new(scene, scene.header().condition_stream, cond_offset);
    let mut out = Vec::new();
    loop {
        let (_, t) = cursor.fetch()?;
        let c = Condition::from(t);
        out.push(c);
        if matches!(c, Condition::End | Condition::Unknown(_)) {
            return Ok(out);
        }
    }
}

/// Decode an action script up to and including its `END`
pub fn disassemble_actions(scene: &Scene, act_offset: u16) -> Result<Vec<Action>, FormatError> {
    let mut cursor = Cursor::new(scene, scene.header().action_stream, act_offset);
    let mut out = Vec::new();
    loop {
        let (_, t) = cursor.fetch()?;
        let a = Action::from(t);
        out.push(a);
        if matches!(a, Action::End | Action::Unknown(_)) {
            return Ok(out);
        }
    }
}
