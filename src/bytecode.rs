//! Opcode triples for the condition and action streams
//!
//! Both streams are flat runs of `[op, a, b]` triples ending in an `END`
//! triple. The byte layout is shared; the meaning of `op` depends on which
//! stream it was read from.

use std::fmt;

use crate::blob::BlobView;
use crate::error::FormatError;

pub const TRIPLE_SIZE: usize = 3;

pub const C_END: u8 = 0;
pub const C_TRUE: u8 = 1;
pub const C_FLAG_SET: u8 = 2;
pub const C_FLAG_CLEAR: u8 = 3;
pub const C_HAS_ITEM: u8 = 4;
pub const C_VAR_EQ: u8 = 5;

pub const A_END: u8 = 0;
pub const A_SHOW_MESSAGE: u8 = 1;
pub const A_SET_FLAG: u8 = 2;
pub const A_CLEAR_FLAG: u8 = 3;
pub const A_GIVE_ITEM: u8 = 4;
pub const A_TAKE_ITEM: u8 = 5;
pub const A_SET_VAR: u8 = 6;
pub const A_SFX: u8 = 7;
pub const A_TRANSITION: u8 = 8;

/// Raw `[op, a, b]` unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple {
    pub op: u8,
    pub a: u8,
    pub b: u8,
}

impl Triple {
    pub fn read(view: &BlobView, offset: usize) -> Result<Triple, FormatError> {
        let [op, a, b] = *view.array::<TRIPLE_SIZE>(offset)?;
        Ok(Triple { op, a, b })
    }

    pub fn bytes(&self) -> [u8; TRIPLE_SIZE] {
        [self.op, self.a, self.b]
    }
}

/// Condition-stream opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    End,
    True,
    FlagSet(u8),
    FlagClear(u8),
    HasItem(u8),
    VarEq(u8, u8),
    Unknown(u8),
}

impl From<Triple> for Condition {
    fn from(t: Triple) -> Self {
        match t.op {
            C_END => Condition::End,
            C_TRUE => Condition::True,
            C_FLAG_SET => Condition::FlagSet(t.a),
            C_FLAG_CLEAR => Condition::FlagClear(t.a),
            C_HAS_ITEM => Condition::HasItem(t.a),
            C_VAR_EQ => Condition::VarEq(t.a, t.b),
            op => Condition::Unknown(op),
        }
    }
}

impl Condition {
    pub fn encode(&self) -> Triple {
        let (op, a, b) = match *self {
            Condition::End => (C_END, 0, 0),
            Condition::True => (C_TRUE, 0, 0),
            Condition::FlagSet(f) => (C_FLAG_SET, f, 0),
            Condition::FlagClear(f) => (C_FLAG_CLEAR, f, 0),
            Condition::HasItem(i) => (C_HAS_ITEM, i, 0),
            Condition::VarEq(v, val) => (C_VAR_EQ, v, val),
            Condition::Unknown(op) => (op, 0, 0),
        };
        Triple { op, a, b }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Condition::End => write!(f, "END"),
            Condition::True => write!(f, "TRUE"),
            Condition::FlagSet(n) => write!(f, "FLAGSET {}", n),
            Condition::FlagClear(n) => write!(f, "FLAGCLR {}", n),
            Condition::HasItem(n) => write!(f, "HAS {}", n),
            Condition::VarEq(v, val) => write!(f, "VAREQ {} {}", v, val),
            Condition::Unknown(op) => write!(f, "??? op={:#04x}", op),
        }
    }
}

/// Action-stream opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    End,
    ShowMessage(u8),
    SetFlag(u8),
    ClearFlag(u8),
    GiveItem(u8),
    TakeItem(u8),
    SetVar(u8, u8),
    Sfx(u8),
    Transition { room: u8, spawn: u8 },
    Unknown(u8),
}

impl From<Triple> for Action {
    fn from(t: Triple) -> Self {
        match t.op {
            A_END => Action::End,
            A_SHOW_MESSAGE => Action::ShowMessage(t.a),
            A_SET_FLAG => Action::SetFlag(t.a),
            A_CLEAR_FLAG => Action::ClearFlag(t.a),
            A_GIVE_ITEM => Action::GiveItem(t.a),
            A_TAKE_ITEM => Action::TakeItem(t.a),
            A_SET_VAR => Action::SetVar(t.a, t.b),
            A_SFX => Action::Sfx(t.a),
            A_TRANSITION => Action::Transition {
                room: t.a,
                spawn: t.b,
            },
            op => Action::Unknown(op),
        }
    }
}

impl Action {
    pub fn encode(&self) -> Triple {
        let (op, a, b) = match *self {
            Action::End => (A_END, 0, 0),
            Action::ShowMessage(m) => (A_SHOW_MESSAGE, m, 0),
            Action::SetFlag(f) => (A_SET_FLAG, f, 0),
            Action::ClearFlag(f) => (A_CLEAR_FLAG, f, 0),
            Action::GiveItem(i) => (A_GIVE_ITEM, i, 0),
            Action::TakeItem(i) => (A_TAKE_ITEM, i, 0),
            Action::SetVar(v, val) => (A_SET_VAR, v, val),
            Action::Sfx(n) => (A_SFX, n, 0),
            Action::Transition { room, spawn } => (A_TRANSITION, room, spawn),
            Action::Unknown(op) => (op, 0, 0),
        };
        Triple { op, a, b }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::End => write!(f, "END"),
            Action::ShowMessage(m) => write!(f, "MSG {}", m),
            Action::SetFlag(n) => write!(f, "SETFLAG {}", n),
            Action::ClearFlag(n) => write!(f, "CLRFLAG {}", n),
            Action::GiveItem(n) => write!(f, "GIVE {}", n),
            Action::TakeItem(n) => write!(f, "TAKE {}", n),
            Action::SetVar(v, val) => write!(f, "SETVAR {} {}", v, val),
            Action::Sfx(n) => write!(f, "SFX {}", n),
            Action::Transition { room, spawn } => write!(f, "TRANSITION R{} S{}", room, spawn),
            Action::Unknown(op) => write!(f, "??? op={:#04x}", op),
        }
    }
}
