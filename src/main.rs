mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    terminal, ExecutableCommand,
};
use log::{error, info, LevelFilter};
use rand::thread_rng;

use spaceship::compute::{handle_key, handle_pointer_move, new_game, spawn_enemy, tick};
use spaceship::config::GameConfig;
use spaceship::controls::{self, Input};
use spaceship::entities::GameEvent;
use spaceship::schedule::Scheduler;
use spaceship::viewport::Viewport;

use display::Blast;

/// Environment variable naming an optional TOML config file.
const CONFIG_ENV: &str = "SPACESHIP_CONFIG";

/// The terminal belongs to the game, so logs go to a file instead.
const LOG_FILE: &str = "spaceship.log";

/// Frames a detonation ring stays on screen.
const BLAST_FRAMES: u32 = 6;

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // No writable log file: stay quiet rather than scribble over the game
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
}

fn load_config() -> std::io::Result<GameConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = GameConfig::load(&path).map_err(std::io::Error::other)?;
            info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}


// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or the input thread goes away.
///
/// Two periodic tasks share this thread: the frame task (collisions,
/// movement, render) and the spawn task.  Between deadlines the loop blocks
/// on the input channel, so key and mouse events are applied in between
/// ticks and this thread stays the only writer of the world.
fn game_loop<W: Write>(
    out: &mut W,
    config: GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    let (cols, rows) = terminal::size()?;
    let mut viewport = Viewport::new(cols, rows, config.width, config.height);
    let mut world = new_game(config, &mut rng);
    let mut scheduler = Scheduler::new(&config, Instant::now());
    let mut blast: Option<Blast> = None;

    display::render(out, &world, &viewport, blast.as_ref())?;

    loop {
        // ── Wait for input or the next deadline ──────────────────────────────
        match rx.recv_timeout(scheduler.timeout(Instant::now())) {
            Ok(ev) => match controls::translate(&ev) {
                Some(Input::Quit) => return Ok(()),
                Some(Input::Steer(direction)) => {
                    world = handle_key(&world, direction);
                }
                Some(Input::Pointer { col, row }) => {
                    let p = Viewport::cell_centre(col, row);
                    world = handle_pointer_move(&world, p.x, p.y);
                }
                Some(Input::Restart) if world.is_over() => {
                    info!("restarting");
                    world = new_game(config, &mut rng);
                    scheduler = Scheduler::new(&config, Instant::now());
                    blast = None;
                    display::render(out, &world, &viewport, None)?;
                }
                Some(Input::Resize { cols, rows }) => {
                    viewport = Viewport::new(cols, rows, config.width, config.height);
                    display::render(out, &world, &viewport, blast.as_ref())?;
                }
                Some(Input::Restart) | None => {}
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        // ── Run whichever tasks are due ──────────────────────────────────────
        let due = scheduler.poll(Instant::now());

        if due.spawn {
            world = spawn_enemy(&world, &mut rng);
        }

        if due.frame && !world.is_over() {
            let (next, events) = tick(&world, &viewport, &mut rng);
            world = next;

            blast = blast.and_then(Blast::fade);
            for event in events {
                match event {
                    GameEvent::Detonation { at, .. } => {
                        blast = Some(Blast::new(at, BLAST_FRAMES));
                    }
                    GameEvent::GameOver { .. } => {
                        blast = None;
                        // Keys already queued must not dismiss the notice
                        while rx.try_recv().is_ok() {}
                    }
                }
            }

            display::render(out, &world, &viewport, blast.as_ref())?;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = load_config()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                error!("terminal input failed: {e}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, config, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("exiting with error: {e}");
    }
    result
}
