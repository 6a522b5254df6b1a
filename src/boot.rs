//! Built-in fallback content
//!
//! A small three-room scene and matching tileset, used whenever no valid
//! scene has been supplied. Room 0 is a corridor with a lab to the right and
//! a hatch room to the left.

use crate::bytecode::{Action, Condition};
use crate::scene::{Edge, Exit, ObjectKind, Verb};
use crate::tileset::{TileFlags, TileRecord};
use crate::writer::{object, with_verb, RoomDraft, SceneWriter, TilesetWriter};

pub const MAP_WIDTH: u8 = 10;
pub const MAP_HEIGHT: u8 = 6;

pub const TILE_FLOOR: u8 = 0;
pub const TILE_WALL: u8 = 1;
pub const TILE_DOOR: u8 = 2;

pub const FLAG_POWER_ON: u8 = 0;
pub const FLAG_HATCH_OPEN: u8 = 1;
pub const FLAG_HAVE_KEYCARD: u8 = 2;
pub const FLAG_LOCKER_OPEN: u8 = 3;

pub const VAR_BREAKERS: u8 = 0;
pub const VAR_VISITS: u8 = 1;

pub const ITEM_KEYCARD: u8 = 0;
pub const ITEM_FUSE: u8 = 1;
pub const ITEM_BADGE: u8 = 2;

pub const ROOM_CORRIDOR: u8 = 0;
pub const ROOM_LAB: u8 = 1;
pub const ROOM_HATCH: u8 = 2;

/// Locker code stored as p0 = hundreds, p1 = remainder
pub const LOCKER_CODE: u16 = 729;
pub const BREAKER_EXPECT: u8 = 0b101;

fn walled_room() -> RoomDraft {
    let mut room = RoomDraft::filled(MAP_WIDTH, MAP_HEIGHT, TILE_FLOOR);
    for x in 0..MAP_WIDTH {
        room = room
            .set_tile(MAP_WIDTH, x, 0, TILE_WALL)
            .set_tile(MAP_WIDTH, x, MAP_HEIGHT - 1, TILE_WALL);
    }
    room
}

pub fn scene_bytes() -> Vec<u8> {
    let mut w = SceneWriter::new(MAP_WIDTH, MAP_HEIGHT)
        .counts(4, 2, 3)
        .start(ROOM_CORRIDOR, 0);

    let m_welcome = w.message("MAINTENANCE DECK. SYSTEMS OFFLINE.");
    let m_keycard = w.message("YOU PICK UP A KEYCARD.");
    let m_keypad = w.message("THE LOCKER WANTS A 3-DIGIT CODE.");
    let m_locker_ok = w.message("THE LOCKER CLICKS OPEN. A FUSE!");
    let m_locker_bad = w.message("WRONG CODE.");
    let m_power_on = w.message("BREAKERS SET. POWER RESTORED.");
    let m_power_bad = w.message("NOTHING HAPPENS.");
    let m_hatch_open = w.message("THE HATCH GRINDS OPEN.");
    let m_notice = w.message("NOTICE: HATCH NEEDS POWER, FUSE AND KEYCARD.");
    let m_intercom = w.message("INTERCOM: FIND THE FUSE IN THE LAB LOCKER.");
    let m_badge = w.message("THE READER BEEPS AT YOUR BADGE.");

    let c_no_keycard = w.condition(&[Condition::FlagClear(FLAG_HAVE_KEYCARD)]);
    let c_locker_closed = w.condition(&[Condition::FlagClear(FLAG_LOCKER_OPEN)]);
    let c_hatch_ready = w.condition(&[
        Condition::HasItem(ITEM_KEYCARD),
        Condition::HasItem(ITEM_FUSE),
        Condition::FlagSet(FLAG_POWER_ON),
    ]);
    let c_hatch_open = w.condition(&[Condition::FlagSet(FLAG_HATCH_OPEN)]);

    let a_welcome = w.action(&[Action::ShowMessage(m_welcome)]);
    let a_take_keycard = w.action(&[
        Action::GiveItem(ITEM_KEYCARD),
        Action::SetFlag(FLAG_HAVE_KEYCARD),
        Action::ShowMessage(m_keycard),
    ]);
    let a_keypad = w.action(&[Action::ShowMessage(m_keypad)]);
    let a_locker_ok = w.action(&[
        Action::GiveItem(ITEM_FUSE),
        Action::SetFlag(FLAG_LOCKER_OPEN),
        Action::ShowMessage(m_locker_ok),
        Action::Sfx(1),
    ]);
    let a_locker_bad = w.action(&[Action::ShowMessage(m_locker_bad)]);
    let a_power_on = w.action(&[
        Action::SetFlag(FLAG_POWER_ON),
        Action::ShowMessage(m_power_on),
    ]);
    let a_power_bad = w.action(&[Action::ShowMessage(m_power_bad)]);
    let a_hatch = w.action(&[
        Action::TakeItem(ITEM_FUSE),
        Action::SetFlag(FLAG_HATCH_OPEN),
        Action::ShowMessage(m_hatch_open),
    ]);
    let a_notice = w.action(&[Action::ShowMessage(m_notice)]);
    let a_intercom = w.action(&[Action::ShowMessage(m_intercom)]);
    let a_badge = w.action(&[Action::ShowMessage(m_badge)]);
    let a_leave = w.action(&[
        Action::SetVar(VAR_VISITS, 1),
        Action::Transition {
            room: ROOM_CORRIDOR,
            spawn: 0,
        },
    ]);

    let sign = with_verb(object(ObjectKind::Sign, 4, 1), Verb::Look, a_welcome);
    let mut keycard = with_verb(object(ObjectKind::Pickup, 6, 4), Verb::Take, a_take_keycard);
    keycard.params = [ITEM_KEYCARD, 0];
    keycard.gate = c_no_keycard;

    let corridor = walled_room()
        .spawn(1, 2)
        .spawn(8, 2)
        .exit(Exit {
            edge: Edge::Right,
            room: ROOM_LAB,
            spawn: 0,
        })
        .exit(Exit {
            edge: Edge::Left,
            room: ROOM_HATCH,
            spawn: 1,
        })
        .object(sign)
        .object(keycard);

    let mut keypad = with_verb(object(ObjectKind::LockerKeypad, 5, 2), Verb::Use, a_keypad);
    keypad.params = [(LOCKER_CODE / 100) as u8, (LOCKER_CODE % 100) as u8];
    keypad.gate = c_locker_closed;
    keypad.alternates = [a_locker_ok, a_locker_bad];

    let mut breaker = with_verb(object(ObjectKind::BreakerPanel, 7, 2), Verb::Operate, 0);
    breaker.params = [VAR_BREAKERS, BREAKER_EXPECT];
    breaker.alternates = [a_power_on, a_power_bad];

    let lab = walled_room()
        .set_tile(MAP_WIDTH, 0, 2, TILE_DOOR)
        .spawn(1, 2)
        .exit(Exit {
            edge: Edge::Left,
            room: ROOM_CORRIDOR,
            spawn: 1,
        })
        .object(keypad)
        .object(breaker);

    let mut hatch = with_verb(object(ObjectKind::HatchPanel, 5, 2), Verb::Use, a_hatch);
    hatch.gate = c_hatch_ready;
    hatch.alternates = [a_hatch, a_badge];
    let intercom = with_verb(object(ObjectKind::NpcIntercom, 2, 1), Verb::Talk, a_intercom);
    let mut trigger = with_verb(object(ObjectKind::ExitTrigger, 5, 4), Verb::Operate, a_leave);
    trigger.gate = c_hatch_open;
    let notice = with_verb(object(ObjectKind::Sign, 7, 1), Verb::Look, a_notice);

    let hatch_room = walled_room()
        .spawn(1, 2)
        .spawn(8, 2)
        .exit(Exit {
            edge: Edge::Right,
            room: ROOM_CORRIDOR,
            spawn: 0,
        })
        .object(hatch)
        .object(intercom)
        .object(trigger)
        .object(notice);

    w.room(corridor);
    w.room(lab);
    w.room(hatch_room);
    w.finish()
}

pub fn tileset_bytes() -> Vec<u8> {
    TilesetWriter::new(2, 2)
        .palette(0, 11, 12)
        .tile(TileRecord {
            id: TILE_FLOOR,
            chars: [b'.'; 4],
            color_mode: 0,
            colors: [12, 12, 12, 12],
            flags: TileFlags::FLOOR | TileFlags::STANDABLE,
        })
        .tile(TileRecord {
            id: TILE_WALL,
            chars: [b'#'; 4],
            color_mode: 1,
            colors: [11, 11, 15, 15],
            flags: TileFlags::SOLID,
        })
        .tile(TileRecord {
            id: TILE_DOOR,
            chars: [b'+'; 4],
            color_mode: 0,
            colors: [7, 7, 7, 7],
            flags: TileFlags::DOOR | TileFlags::INTERACTABLE,
        })
        .finish()
}
