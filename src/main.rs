mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use boss_arena::compute::{init_state, tick};
use boss_arena::config::{Encounter, EncounterKind};
use boss_arena::demo::autopilot;
use boss_arena::entities::{GamePhase, GameState, InputState};
use boss_arena::render::{build_render_frame, RenderFrame, RenderSink, SpriteKind};

use crate::display::TerminalSink;

const FRAME: Duration = Duration::from_micros(16_667); // 60 updates per second

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(name = "boss_arena", about = "Fixed-timestep 2D boss fights")]
struct Args {
    /// Which fight to load: castle, arena or bridge.
    #[arg(long, default_value = "castle")]
    encounter: EncounterKind,

    /// RNG seed; omitted means a fresh seed every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate without a terminal and print a summary.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Frame budget for headless runs.
    #[arg(long, default_value_t = 3_600)]
    frames: u64,

    /// Let the demo autopilot drive the hero.
    #[arg(long, default_value_t = false)]
    autopilot: bool,

    /// Write logs here (terminal mode never logs to the screen).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging(args: &Args) -> Result<()> {
    match (&args.log_file, args.headless) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
        }
        // A subscriber writing to the terminal would tear up the game screen.
        (None, false) => {}
    }
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Collapse the held-key map into the simulation's input snapshot.
fn snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    use KeyCode::Char;
    InputState {
        left: any_held(key_frame, &[KeyCode::Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, Char('d'), Char('D')], frame),
        up: any_held(key_frame, &[KeyCode::Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, Char('s'), Char('S')], frame),
        jump: is_held(key_frame, &Char(' '), frame),
        attack: any_held(key_frame, &[Char('e'), Char('E'), Char('z'), Char('Z')], frame),
        interact: is_held(key_frame, &KeyCode::Enter, frame),
        quit: any_held(key_frame, &[Char('q'), Char('Q'), KeyCode::Esc], frame),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the session finishes or the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the keys that are still "fresh" (within
/// `HOLD_WINDOW` frames) become the `InputState` for that tick, so jump,
/// attack and a direction can all be held at once.
fn game_loop<W: Write>(
    sink: &mut TerminalSink<W>,
    encounter: &Encounter,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    use_autopilot: bool,
) -> Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    while !state.finished {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => (code, kind, modifiers),
                Event::Resize(cols, rows) => {
                    sink.resize(cols, rows);
                    continue;
                }
                _ => continue,
            };
            match kind {
                KeyEventKind::Press => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        tracing::info!(frame = state.frame, "interrupted");
                        return Ok(());
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let keys = snapshot(&key_frame, frame);
        if keys.quit {
            tracing::info!(frame = state.frame, "quit requested");
            return Ok(());
        }
        let input = if use_autopilot {
            autopilot(state, encounter)
        } else {
            keys
        };

        *state = tick(state, encounter, &input, rng);
        for event in &state.events {
            tracing::debug!(frame = state.frame, ?event, "frame event");
        }

        sink.present(&build_render_frame(state, encounter))
            .context("drawing frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

fn run_terminal(args: &Args, encounter: &Encounter, rng: &mut StdRng) -> Result<()> {
    let mut state = init_state(encounter).context("starting encounter")?;
    let mut sink = TerminalSink::new(BufWriter::new(stdout())).context("querying terminal size")?;

    terminal::enable_raw_mode()?;
    let out = sink.get_mut();
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut sink, encounter, &mut state, &rx, rng, args.autopilot);

    // Always restore the terminal
    let out = sink.get_mut();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!(
        phase = ?state.phase,
        frame = state.frame,
        boss_health = state.boss.health,
        lives = state.player.lives,
        "session ended"
    );
    result
}

// ── Headless ──────────────────────────────────────────────────────────────────

/// Keeps just enough of each frame to summarise a run.
#[derive(Default)]
struct Summary {
    frames: u64,
    peak_projectiles: usize,
    last: Option<RenderFrame>,
}

impl RenderSink for Summary {
    type Error = std::convert::Infallible;

    fn present(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        self.frames += 1;
        let projectiles = frame
            .sprites
            .iter()
            .filter(|s| matches!(s.kind, SpriteKind::Projectile { .. }))
            .count();
        self.peak_projectiles = self.peak_projectiles.max(projectiles);
        self.last = Some(frame.clone());
        Ok(())
    }
}

fn run_headless(args: &Args, encounter: &Encounter, rng: &mut StdRng) -> Result<()> {
    let mut state = init_state(encounter).context("starting encounter")?;
    let mut summary = Summary::default();

    for _ in 0..args.frames {
        if state.finished {
            break;
        }
        let input = if args.autopilot {
            autopilot(&state, encounter)
        } else {
            InputState::default()
        };
        state = tick(&state, encounter, &input, rng);
        for event in &state.events {
            tracing::debug!(frame = state.frame, ?event, "frame event");
        }
        summary
            .present(&build_render_frame(&state, encounter))
            .unwrap_or_else(|never| match never {});
    }

    let outcome = match state.phase {
        GamePhase::Victory => "victory",
        GamePhase::Defeat => "defeat",
        _ => "unfinished",
    };
    println!("encounter:        {}", encounter.kind.name());
    println!("frames simulated: {}", summary.frames);
    println!("outcome:          {outcome} (phase {:?})", state.phase);
    println!(
        "boss health:      {}/{} (phase {})",
        state.boss.health,
        state.boss.max_health,
        state.boss.phase.number()
    );
    println!("lives left:       {}", state.player.lives);
    println!("peak projectiles: {}", summary.peak_projectiles);
    if let Some(last) = &summary.last {
        println!("final progress:   {:.2}", last.phase_progress);
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let encounter = Encounter::from_kind(args.encounter);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(encounter = encounter.kind.name(), seed = ?args.seed, "starting");

    if args.headless {
        run_headless(&args, &encounter, &mut rng)
    } else {
        run_terminal(&args, &encounter, &mut rng)
    }
}
