use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env};
use log::{debug, info, warn};

use levelrun::config::Settings;
use levelrun::interpreter::ActionOutcome;
use levelrun::player::{Direction, StepOutcome};
use levelrun::scene::{Scene, Verb};
use levelrun::session::{GameSession, Interaction};
use levelrun::textbox::{TextSink, Textbox};
use levelrun::tileset::Tileset;

fn print_usage(program: &str) {
    println!("levelrun - room-based adventure runtime");
    println!();
    println!("Usage: {} [--config file.toml] [--scene file.bin] [--tiles file.tset]", program);
    println!();
    println!("With no scene, the built-in demo deck is played.");
    println!("Type 'help' at the prompt for commands.");
}

fn print_commands() {
    println!("  l r u d              move one tile");
    println!("  look|take|use|talk|operate [n]");
    println!("                       apply a verb to object n, or the object underfoot");
    println!("  code <digits> [n]    enter a keypad code");
    println!("  breakers <bits> [n]  set breaker switches, e.g. 'breakers 101'");
    println!("  alt <slot> [n]       run an object's alternate script");
    println!("  objects              list objects in this room");
    println!("  inv                  show inventory");
    println!("  map                  draw the room");
    println!("  header               dump scene and tileset headers");
    println!("  quit");
}

fn read_blob(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", path.display(), e);
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut scene_path: Option<PathBuf> = None;
    let mut tiles_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).map(PathBuf::from);
        if value.is_none() && matches!(flag, "--config" | "--scene" | "--tiles") {
            eprintln!("Error: {} needs a file argument", flag);
            print_usage(&args[0]);
            std::process::exit(2);
        }
        match flag {
            "--config" => config_path = value,
            "--scene" => scene_path = value,
            "--tiles" => tiles_path = value,
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            other => {
                eprintln!("Error: Unknown argument '{}'", other);
                print_usage(&args[0]);
                std::process::exit(2);
            }
        }
        i += 2;
    }

    let mut settings = match &config_path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    // command line wins over the config file
    if scene_path.is_some() {
        settings.scene = scene_path;
    }
    if tiles_path.is_some() {
        settings.tileset = tiles_path;
    }

    Builder::from_env(Env::default().default_filter_or(settings.log_filter.as_str())).init();
    debug!("Settings: {:?}", settings);

    let scene = match settings.scene.as_deref().and_then(read_blob) {
        Some(bytes) => Scene::load(bytes).unwrap_or_else(|e| {
            warn!("Scene rejected ({}), using built-in scene", e);
            Scene::builtin()
        }),
        None => Scene::builtin(),
    };
    let tileset = match settings.tileset.as_deref().and_then(read_blob) {
        Some(bytes) => Tileset::load_or_absent(bytes),
        None => Tileset::builtin(),
    };

    let mut session = GameSession::with_inventory_capacity(
        scene,
        tileset,
        Textbox::new(),
        settings.inventory_capacity,
    );
    info!(
        "{} rooms, {}x{} map",
        session.scene().room_count(),
        session.scene().map_width(),
        session.scene().map_height()
    );

    draw_map(&session);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, rest)) = words.split_first() else {
            continue;
        };
        if cmd == "quit" || cmd == "q" {
            break;
        }
        run_command(&mut session, cmd, rest);
    }
    Ok(())
}

fn run_command(session: &mut GameSession, cmd: &str, rest: &[&str]) {
    let arg = |n: usize| rest.get(n).and_then(|s| s.parse::<u8>().ok());
    let target = |n: usize| arg(n).or_else(|| session.object_here());

    match cmd {
        "l" | "r" | "u" | "d" => {
            let dir = match cmd {
                "l" => Direction::Left,
                "r" => Direction::Right,
                "u" => Direction::Up,
                _ => Direction::Down,
            };
            match session.step(dir) {
                StepOutcome::Moved { .. } => {}
                StepOutcome::Blocked => println!("Something solid is in the way."),
                StepOutcome::NoExit(_) => println!("You can't go that way."),
                StepOutcome::Exited(exit) => {
                    println!("You enter room {}.", exit.room);
                    draw_map(session);
                }
            }
        }
        "code" => {
            let code = rest.first().and_then(|s| s.parse::<u16>().ok());
            match (code, target(1)) {
                (Some(code), Some(obj)) => {
                    let result = session.enter_keypad_code(obj, code);
                    report(session, result);
                }
                _ => println!("Usage: code <digits> [object]"),
            }
        }
        "breakers" => {
            let bits = rest.first().and_then(|s| u8::from_str_radix(s, 2).ok());
            match (bits, target(1)) {
                (Some(bits), Some(obj)) => {
                    let result = session.set_breakers(obj, bits);
                    report(session, result);
                }
                _ => println!("Usage: breakers <bits> [object]"),
            }
        }
        "alt" => match (rest.first().and_then(|s| s.parse::<usize>().ok()), target(1)) {
            (Some(slot), Some(obj)) => {
                let result = session.run_alternate(obj, slot);
                report(session, result);
            }
            _ => println!("Usage: alt <slot> [object]"),
        },
        "objects" => list_objects(session),
        "inv" | "i" => {
            let items = session.inventory().items();
            if items.is_empty() {
                println!("You are empty-handed.");
            } else {
                println!("Carrying items: {:?}", items);
            }
        }
        "map" => draw_map(session),
        "header" => {
            print!("{}", session.scene().header());
            match session.tileset().header() {
                Some(h) => print!("{}", h),
                None => println!("No tileset loaded."),
            }
        }
        "help" | "?" => print_commands(),
        verb => match Verb::from_name(verb) {
            Some(verb) => match target(0) {
                Some(obj) => {
                    let result = session.interact(obj, verb);
                    report(session, result);
                }
                None => println!("There is nothing here to {}.", verb.name()),
            },
            None => println!("I don't know '{}'. Type 'help'.", verb),
        },
    }
}

fn report(
    session: &mut GameSession,
    result: Result<Interaction, levelrun::error::FormatError>,
) {
    match result {
        Ok(Interaction::Ran(outcome)) => {
            if let Some(text) = session.textbox().text() {
                println!("{}", text);
            }
            if let ActionOutcome::Transitioned { room, .. } = outcome {
                println!("You are now in room {}.", room);
                draw_map(session);
            }
            if session.textbox_mut().show(None).is_err() {
                debug!("Could not clear textbox");
            }
        }
        Ok(Interaction::Gated) => println!("Nothing happens."),
        Ok(Interaction::Unsupported) => println!("You can't do that with it."),
        Ok(Interaction::WrongKind(kind)) => println!("That doesn't work on a {:?}.", kind),
        Err(e) => println!("No such object ({}).", e),
    }
}

fn list_objects(session: &GameSession) {
    let Some(room) = session.current_room() else {
        println!("No room loaded.");
        return;
    };
    for i in 0..room.object_count() {
        if let Ok(obj) = room.object(i) {
            let verbs: Vec<&str> = Verb::ALL
                .iter()
                .filter(|v| obj.supports(**v))
                .map(|v| v.name())
                .collect();
            println!(
                "  {}: {:?} at ({}, {}) [{}]",
                i,
                obj.kind,
                obj.x,
                obj.y,
                verbs.join(" ")
            );
        }
    }
}

fn draw_map(session: &GameSession) {
    let Some(room) = session.current_room() else {
        return;
    };
    let scene = session.scene();
    let tiles = session.tileset();
    let player = session.player();
    println!("Room {}", room.id());
    for y in 0..scene.map_height() {
        let row: String = (0..scene.map_width())
            .map(|x| {
                if (x, y) == (player.x, player.y) {
                    '@'
                } else if room.object_at(x, y).is_some() {
                    '*'
                } else {
                    room.tile_at(x, y)
                        .map(|t| tiles.chars(t)[0] as char)
                        .unwrap_or(' ')
                }
            })
            .collect();
        println!("{}", row);
    }
}
