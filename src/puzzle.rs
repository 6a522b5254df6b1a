//! Puzzle flags and variables
//!
//! Sized from the active scene's header counts. Ids at or beyond the
//! declared count read as zero and ignore writes.

use bitvec::prelude::*;
use log::{debug, warn};

use crate::header::SceneHeader;

pub const MAX_FLAGS: usize = 256;
pub const MAX_VARS: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleState {
    flags: BitVec<u8, Lsb0>,
    vars: Vec<u8>,
}

impl PuzzleState {
    pub fn new(flag_count: u8, var_count: u8) -> Self {
        let mut state = PuzzleState::default();
        state.reset(flag_count, var_count);
        state
    }

    pub fn for_scene(header: &SceneHeader) -> Self {
        PuzzleState::new(header.flag_count, header.var_count)
    }

    /// Resize to the given counts (clamped to the hard maxima) and zero
    /// everything
    pub fn reset(&mut self, flag_count: u8, var_count: u8) {
        let mut flags = flag_count as usize;
        if flags > MAX_FLAGS {
            warn!("Flag count {} exceeds maximum {}, clamping", flags, MAX_FLAGS);
            flags = MAX_FLAGS;
        }
        let mut vars = var_count as usize;
        if vars > MAX_VARS {
            warn!("Variable count {} exceeds maximum {}, clamping", vars, MAX_VARS);
            vars = MAX_VARS;
        }

        self.flags = bitvec![u8, Lsb0; 0; flags];
        self.vars = vec![0; vars];
        debug!("Puzzle state reset: {} flags, {} vars", flags, vars);
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn flag_get(&self, id: u8) -> bool {
        self.flags.get(id as usize).map(|b| *b).unwrap_or(false)
    }

    pub fn flag_set(&mut self, id: u8) {
        self.write_flag(id, true);
    }

    pub fn flag_clear(&mut self, id: u8) {
        self.write_flag(id, false);
    }

    fn write_flag(&mut self, id: u8, value: bool) {
        let len = self.flags.len();
        match self.flags.get_mut(id as usize) {
            Some(mut bit) => *bit = value,
            None => debug!("Ignoring write to flag {} (count {})", id, len),
        }
    }

    pub fn var_get(&self, id: u8) -> u8 {
        self.vars.get(id as usize).copied().unwrap_or(0)
    }

    pub fn var_set(&mut self, id: u8, value: u8) {
        match self.vars.get_mut(id as usize) {
            Some(slot) => *slot = value,
            None => debug!("Ignoring write to var {} (count {})", id, self.vars.len()),
        }
    }
}
