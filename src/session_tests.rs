use crate::boot::{
    self, BREAKER_EXPECT, FLAG_HATCH_OPEN, FLAG_HAVE_KEYCARD, FLAG_LOCKER_OPEN, FLAG_POWER_ON,
    ITEM_FUSE, ITEM_KEYCARD, LOCKER_CODE, ROOM_CORRIDOR, ROOM_HATCH, ROOM_LAB, VAR_BREAKERS,
    VAR_VISITS,
};
use crate::bytecode::Action;
use crate::interpreter::ActionOutcome;
use crate::player::{Direction, Player, StepOutcome};
use crate::scene::{Edge, Exit, ObjectKind, Scene, Verb};
use crate::session::{GameSession, Interaction};
use crate::test_utils::three_rooms;
use crate::textbox::{DisplayError, TextSink, Textbox};
use crate::tileset::Tileset;
use crate::writer::{object, with_verb, RoomDraft, SceneWriter};

use test_log::test;

const SIGN: u8 = 0;
const KEYCARD: u8 = 1;
const KEYPAD: u8 = 0;
const BREAKER: u8 = 1;
const HATCH: u8 = 0;
const INTERCOM: u8 = 1;
const TRIGGER: u8 = 2;

fn ran() -> Interaction {
    Interaction::Ran(ActionOutcome::Finished)
}

#[test]
fn starts_in_start_room() {
    let s = GameSession::builtin();
    assert_eq!(s.navigator().room_id(), Some(ROOM_CORRIDOR));
    assert_eq!(s.player(), Player { x: 1, y: 2 });
    assert!(s.inventory().is_empty());
    assert_eq!(s.puzzle().flag_count(), 4);
    assert_eq!(s.puzzle().var_count(), 2);
    assert_eq!(s.textbox().text(), None);
}

#[test]
fn walls_block_movement() {
    let mut s = GameSession::builtin();
    assert_eq!(s.step(Direction::Up), StepOutcome::Moved { x: 1, y: 1 });
    assert_eq!(s.step(Direction::Up), StepOutcome::Blocked);
    assert_eq!(s.player(), Player { x: 1, y: 1 });
}

#[test]
fn walking_off_left_edge_enters_hatch_room() {
    let mut s = GameSession::builtin();
    assert_eq!(s.step(Direction::Left), StepOutcome::Moved { x: 0, y: 2 });
    assert_eq!(
        s.step(Direction::Left),
        StepOutcome::Exited(Exit {
            edge: Edge::Left,
            room: ROOM_HATCH,
            spawn: 1
        })
    );
    assert_eq!(s.navigator().room_id(), Some(ROOM_HATCH));
    assert_eq!(s.navigator().spawn_id(), Some(1));
    assert_eq!(s.player(), Player { x: 8, y: 2 });

    // queries now answer for the hatch room
    let room = s.current_room().unwrap();
    assert_eq!(room.id(), ROOM_HATCH);
    assert_eq!(room.object_count(), 4);
    assert_eq!(room.exit_for(Edge::Right).map(|e| e.room), Some(ROOM_CORRIDOR));
    assert_eq!(
        s.object(HATCH).unwrap().kind,
        ObjectKind::HatchPanel
    );
}

#[test]
fn lab_door_is_walkable() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_LAB, 0).unwrap();
    assert_eq!(s.step(Direction::Left), StepOutcome::Moved { x: 0, y: 2 });
    assert!(matches!(s.step(Direction::Left), StepOutcome::Exited(_)));
    assert_eq!(s.navigator().room_id(), Some(ROOM_CORRIDOR));
    assert_eq!(s.player(), Player { x: 8, y: 2 });
}

#[test]
fn edge_without_exit_stays_put() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_LAB, 0).unwrap();
    for _ in 0..8 {
        s.step(Direction::Right);
    }
    assert_eq!(s.player(), Player { x: 9, y: 2 });
    assert_eq!(s.step(Direction::Right), StepOutcome::NoExit(Edge::Right));
    assert_eq!(s.navigator().room_id(), Some(ROOM_LAB));
}

#[test]
fn sign_and_verb_mask() {
    let mut s = GameSession::builtin();
    assert_eq!(s.interact(SIGN, Verb::Take).unwrap(), Interaction::Unsupported);
    assert_eq!(s.textbox().text(), None);
    assert_eq!(s.interact(SIGN, Verb::Look).unwrap(), ran());
    assert_eq!(s.textbox().text(), Some("MAINTENANCE DECK. SYSTEMS OFFLINE."));
}

#[test]
fn keycard_can_only_be_taken_once() {
    let mut s = GameSession::builtin();
    assert_eq!(s.interact(KEYCARD, Verb::Take).unwrap(), ran());
    assert!(s.inventory().has(ITEM_KEYCARD));
    assert!(s.puzzle().flag_get(FLAG_HAVE_KEYCARD));
    assert_eq!(s.textbox().text(), Some("YOU PICK UP A KEYCARD."));

    assert_eq!(s.interact(KEYCARD, Verb::Take).unwrap(), Interaction::Gated);
    assert_eq!(s.inventory().len(), 1);
}

#[test]
fn object_here_follows_player() {
    let mut s = GameSession::builtin();
    assert_eq!(s.object_here(), None);
    // keycard sits at (6, 4)
    for _ in 0..5 {
        s.step(Direction::Right);
    }
    s.step(Direction::Down);
    s.step(Direction::Down);
    assert_eq!(s.player(), Player { x: 6, y: 4 });
    assert_eq!(s.object_here(), Some(KEYCARD));
}

#[test]
fn missing_object_is_an_error() {
    let mut s = GameSession::builtin();
    assert!(s.object(9).is_err());
    assert!(s.interact(9, Verb::Look).is_err());
    assert!(s.run_alternate(SIGN, 2).is_err());
}

#[test]
fn keypad_code_picks_alternate() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_LAB, 0).unwrap();

    assert_eq!(s.interact(KEYPAD, Verb::Use).unwrap(), ran());
    assert_eq!(s.textbox().text(), Some("THE LOCKER WANTS A 3-DIGIT CODE."));

    assert_eq!(s.enter_keypad_code(KEYPAD, 123).unwrap(), ran());
    assert_eq!(s.textbox().text(), Some("WRONG CODE."));
    assert!(!s.inventory().has(ITEM_FUSE));

    assert_eq!(s.enter_keypad_code(KEYPAD, LOCKER_CODE).unwrap(), ran());
    assert_eq!(s.textbox().text(), Some("THE LOCKER CLICKS OPEN. A FUSE!"));
    assert!(s.inventory().has(ITEM_FUSE));
    assert!(s.puzzle().flag_get(FLAG_LOCKER_OPEN));

    // locker is open now; the gate shuts every verb
    assert_eq!(
        s.enter_keypad_code(KEYPAD, LOCKER_CODE).unwrap(),
        Interaction::Gated
    );
    assert_eq!(s.interact(KEYPAD, Verb::Use).unwrap(), Interaction::Gated);
    assert_eq!(s.inventory().len(), 1);
}

#[test]
fn keypad_needs_a_keypad() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_LAB, 0).unwrap();
    assert_eq!(
        s.enter_keypad_code(BREAKER, LOCKER_CODE).unwrap(),
        Interaction::WrongKind(ObjectKind::BreakerPanel)
    );
    assert_eq!(
        s.set_breakers(KEYPAD, BREAKER_EXPECT).unwrap(),
        Interaction::WrongKind(ObjectKind::LockerKeypad)
    );
}

#[test]
fn breakers_store_bits_and_check_pattern() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_LAB, 0).unwrap();

    assert_eq!(s.set_breakers(BREAKER, 0b011).unwrap(), ran());
    assert_eq!(s.puzzle().var_get(VAR_BREAKERS), 0b011);
    assert_eq!(s.textbox().text(), Some("NOTHING HAPPENS."));
    assert!(!s.puzzle().flag_get(FLAG_POWER_ON));

    // only the low three switches count
    assert_eq!(s.set_breakers(BREAKER, 0b1000 | BREAKER_EXPECT).unwrap(), ran());
    assert_eq!(s.puzzle().var_get(VAR_BREAKERS), BREAKER_EXPECT);
    assert!(s.puzzle().flag_get(FLAG_POWER_ON));
    assert_eq!(s.textbox().text(), Some("BREAKERS SET. POWER RESTORED."));
}

#[test]
fn full_playthrough() {
    let mut s = GameSession::builtin();
    s.interact(KEYCARD, Verb::Take).unwrap();

    s.enter_room(ROOM_HATCH, 0).unwrap();
    assert_eq!(s.interact(HATCH, Verb::Use).unwrap(), Interaction::Gated);
    assert_eq!(s.interact(TRIGGER, Verb::Operate).unwrap(), Interaction::Gated);

    s.enter_room(ROOM_LAB, 0).unwrap();
    s.enter_keypad_code(KEYPAD, LOCKER_CODE).unwrap();
    s.set_breakers(BREAKER, BREAKER_EXPECT).unwrap();

    s.enter_room(ROOM_HATCH, 0).unwrap();
    assert_eq!(s.interact(HATCH, Verb::Use).unwrap(), ran());
    assert!(s.puzzle().flag_get(FLAG_HATCH_OPEN));
    assert!(!s.inventory().has(ITEM_FUSE));
    assert!(s.inventory().has(ITEM_KEYCARD));
    assert_eq!(s.textbox().text(), Some("THE HATCH GRINDS OPEN."));

    assert_eq!(
        s.interact(TRIGGER, Verb::Operate).unwrap(),
        Interaction::Ran(ActionOutcome::Transitioned {
            room: ROOM_CORRIDOR,
            spawn: 0
        })
    );
    assert_eq!(s.puzzle().var_get(VAR_VISITS), 1);
    assert_eq!(s.navigator().room_id(), Some(ROOM_CORRIDOR));
    assert_eq!(s.player(), Player { x: 1, y: 2 });
}

#[test]
fn alternates_share_the_gate() {
    let mut s = GameSession::builtin();
    s.enter_room(ROOM_HATCH, 0).unwrap();
    assert_eq!(s.run_alternate(HATCH, 1).unwrap(), Interaction::Gated);

    s.inventory_mut().add(ITEM_KEYCARD);
    s.inventory_mut().add(ITEM_FUSE);
    s.puzzle_mut().flag_set(FLAG_POWER_ON);
    assert_eq!(s.run_alternate(HATCH, 1).unwrap(), ran());
    assert_eq!(s.textbox().text(), Some("THE READER BEEPS AT YOUR BADGE."));
}

#[test]
fn textbox_keeps_history() {
    let mut s = GameSession::builtin();
    s.interact(SIGN, Verb::Look).unwrap();
    s.enter_room(ROOM_HATCH, 0).unwrap();
    s.interact(INTERCOM, Verb::Talk).unwrap();
    assert_eq!(
        s.textbox().history(),
        &[
            "MAINTENANCE DECK. SYSTEMS OFFLINE.".to_string(),
            "INTERCOM: FIND THE FUSE IN THE LAB LOCKER.".to_string(),
        ]
    );
}

#[test]
fn unknown_message_clears_textbox() {
    let mut w = SceneWriter::new(2, 2);
    w.message("ONLY ONE");
    let first = w.action(&[Action::ShowMessage(0)]);
    let missing = w.action(&[Action::ShowMessage(5)]);
    w.room(RoomDraft::filled(2, 2, 0).spawn(0, 0));
    let scene = Scene::load(w.finish()).unwrap();
    let mut s = GameSession::new(scene, Tileset::absent(), Textbox::new());

    s.execute(first);
    assert_eq!(s.textbox().text(), Some("ONLY ONE"));
    s.execute(missing);
    assert_eq!(s.textbox().text(), None);
    assert_eq!(s.textbox().history().len(), 1);
}

#[test]
fn rejected_scene_keeps_current_one() {
    let mut s = GameSession::builtin();
    s.step(Direction::Up);
    s.puzzle_mut().flag_set(FLAG_POWER_ON);
    let header = s.scene().header().clone();

    let mut bad = boot::scene_bytes();
    bad[4] = 7;
    assert!(s.load_scene(bad).is_err());

    assert!(s.scene().same_blob(&Scene::builtin()));
    assert_eq!(s.scene().header(), &header);
    assert_eq!(s.navigator().room_id(), Some(ROOM_CORRIDOR));
    assert_eq!(s.player(), Player { x: 1, y: 1 });
    assert!(s.puzzle().flag_get(FLAG_POWER_ON));
}

#[test]
fn accepted_scene_restarts() {
    let mut s = GameSession::builtin();
    s.interact(KEYCARD, Verb::Take).unwrap();
    s.load_scene(three_rooms().bytes().to_vec()).unwrap();

    assert_eq!(s.scene().room_count(), 3);
    assert_eq!(s.scene().map_width(), 5);
    assert_eq!(s.puzzle().flag_count(), 8);
    assert!(s.inventory().is_empty());
    assert_eq!(s.navigator().room_id(), Some(0));
    assert_eq!(s.player(), Player { x: 2, y: 2 });
}

#[test]
fn bad_start_room_falls_back_to_room_zero() {
    let mut w = SceneWriter::new(3, 3).start(9, 0);
    w.room(RoomDraft::filled(3, 3, 0).spawn(2, 1));
    let scene = Scene::load(w.finish()).unwrap();
    let s = GameSession::new(scene, Tileset::absent(), Textbox::new());
    assert_eq!(s.navigator().room_id(), Some(0));
    assert_eq!(s.player(), Player { x: 2, y: 1 });
}

#[test]
fn rejected_tileset_keeps_current_one() {
    let mut s = GameSession::builtin();
    let mut bad = boot::tileset_bytes();
    bad[0] = b'X';
    assert!(s.load_tileset(bad).is_err());
    assert!(s.load_tileset(b"junk".to_vec()).is_err());
    assert!(s.tileset().is_present());
    // walls still block
    assert_eq!(s.step(Direction::Up), StepOutcome::Moved { x: 1, y: 1 });
    assert_eq!(s.step(Direction::Up), StepOutcome::Blocked);
}

#[test]
fn rejected_tileset_without_previous_stays_absent() {
    let mut s = GameSession::new(Scene::builtin(), Tileset::absent(), Textbox::new());
    assert!(s.load_tileset(b"junk".to_vec()).is_err());
    assert!(!s.tileset().is_present());

    s.load_tileset(boot::tileset_bytes()).unwrap();
    assert!(s.tileset().is_present());
    assert_eq!(s.step(Direction::Up), StepOutcome::Moved { x: 1, y: 1 });
    assert_eq!(s.step(Direction::Up), StepOutcome::Blocked);
}

#[test]
fn roomless_scene_leaves_no_room_loaded() {
    let mut s = GameSession::builtin();
    assert!(s.navigator().room_id().is_some());
    s.load_scene(SceneWriter::new(3, 3).finish()).unwrap();

    assert_eq!(s.scene().room_count(), 0);
    assert_eq!(s.navigator().room_id(), None);
    assert!(s.current_room().is_none());
    assert!(s.object(0).is_err());
    assert_eq!(s.object_here(), None);
    assert_eq!(s.player(), Player { x: 0, y: 0 });
    assert_eq!(s.step(Direction::Right), StepOutcome::Blocked);
    assert_eq!(s.step(Direction::Left), StepOutcome::NoExit(Edge::Left));
}

struct BrokenDisplay;

impl TextSink for BrokenDisplay {
    fn show(&mut self, _text: Option<&str>) -> Result<(), DisplayError> {
        Err(DisplayError::new("display offline"))
    }

    fn text(&self) -> Option<&str> {
        None
    }
}

#[test]
fn display_failure_does_not_stop_the_script() {
    let mut w = SceneWriter::new(2, 2).counts(1, 0, 1);
    let m = w.message("HELLO.");
    let a = w.action(&[Action::ShowMessage(m), Action::SetFlag(0), Action::GiveItem(0)]);
    w.room(
        RoomDraft::filled(2, 2, 0)
            .spawn(0, 0)
            .object(with_verb(object(ObjectKind::Sign, 1, 1), Verb::Look, a)),
    );
    let mut s = GameSession::new(Scene::load(w.finish()).unwrap(), Tileset::absent(), BrokenDisplay);

    assert_eq!(s.interact(0, Verb::Look).unwrap(), ran());
    assert!(s.puzzle().flag_get(0));
    assert!(s.inventory().has(0));
    assert_eq!(s.textbox().text(), None);
}

#[test]
fn transition_to_missing_room_stays() {
    let mut w = SceneWriter::new(2, 2);
    let bad = w.action(&[Action::Transition { room: 4, spawn: 0 }]);
    w.room(RoomDraft::filled(2, 2, 0).spawn(1, 1));
    let scene = Scene::load(w.finish()).unwrap();
    let mut s = GameSession::new(scene, Tileset::absent(), Textbox::new());

    assert_eq!(
        s.execute(bad),
        ActionOutcome::Transitioned { room: 4, spawn: 0 }
    );
    assert_eq!(s.navigator().room_id(), Some(0));
    assert_eq!(s.player(), Player { x: 1, y: 1 });
}

#[test]
fn small_inventory_drops_extra_items() {
    let mut s = GameSession::with_inventory_capacity(
        Scene::builtin(),
        Tileset::builtin(),
        Textbox::new(),
        1,
    );
    s.interact(KEYCARD, Verb::Take).unwrap();
    s.enter_room(ROOM_LAB, 0).unwrap();
    s.enter_keypad_code(KEYPAD, LOCKER_CODE).unwrap();
    assert_eq!(s.inventory().items(), &[ITEM_KEYCARD]);
    // the script still ran to completion
    assert!(s.puzzle().flag_get(FLAG_LOCKER_OPEN));
}

#[test]
fn exits_in_fixture_scene() {
    let mut s = GameSession::new(three_rooms(), Tileset::absent(), Textbox::new());
    s.step(Direction::Left);
    s.step(Direction::Left);
    assert!(matches!(s.step(Direction::Left), StepOutcome::Exited(_)));
    assert_eq!(s.navigator().room_id(), Some(2));
    assert_eq!(s.player(), Player { x: 4, y: 3 });
}
