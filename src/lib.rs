#[macro_use]
extern crate lazy_static;

pub mod blob;
pub mod boot;
pub mod bytecode;
pub mod config;
pub mod error;
pub mod header;
pub mod interpreter;
pub mod inventory;
pub mod navigator;
pub mod player;
pub mod puzzle;
pub mod scene;
pub mod session;
pub mod textbox;
pub mod tileset;
pub mod writer;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod session_tests;


/*
Memory map of the built-in scene
        0000    header (22 bytes)
        0016    room directory (3 x 8)
        002e    room 0: map, spawns, exits, objects
        ....    rooms 1, 2
        ....    condition stream (opens with END at offset 0)
        ....    action stream (opens with END at offset 0)
        ....    message table + NUL-terminated text
*/
