use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};

use webshooter::config::{GameConfig, CONFIG_ENV, DEFAULT_CONFIG_PATH};
use webshooter::display::Terminal;
use webshooter::error::ConfigError;
use webshooter::frontend::Frontend;
use webshooter::session::{FrameControl, Session};

// ── Configuration ─────────────────────────────────────────────────────────────

/// CLI argument, then `WEBSHOOTER_CONFIG`, then the shipped sample file.
/// A file the user named explicitly must load; the sample is optional.
fn load_config() -> Result<GameConfig, ConfigError> {
    let explicit = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from);
    if let Some(path) = explicit {
        return GameConfig::load(&path);
    }

    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        log::warn!("{} not found, using built-in defaults", path.display());
        return Ok(GameConfig::default());
    }
    GameConfig::load(path).or_else(|e| {
        log::error!("{e}. Using built-in defaults.");
        Ok(GameConfig::default())
    })
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Keep the game-over banner up, still honouring quit.  Returns `true` if
/// the player quit during the hold.
///
/// Every other key pressed during the hold is drained and dropped, so a
/// fire or pause aimed at the old run never reaches the fresh one.
fn hold_game_over<F: Frontend>(frontend: &mut F, hold: Duration, frame: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < hold {
        if frontend.poll_input().quit {
            return true;
        }
        thread::sleep(frame);
    }
    false
}

fn run<W: Write>(out: W, rx: mpsc::Receiver<Event>, config: GameConfig) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut frontend = Terminal::new(out, rx, cols, rows, &config);

    let frame = Duration::from_millis(config.frame_ms);
    let hold = Duration::from_millis(config.game_over_hold_ms);
    let mut session = Session::new(config);

    loop {
        let frame_start = Instant::now();

        match session.run_frame(&mut frontend)? {
            FrameControl::Quit => break,
            FrameControl::GameOver => {
                if hold_game_over(&mut frontend, hold, frame) {
                    break;
                }
            }
            FrameControl::Continue => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("webshooter: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "starting on a {}x{} field, boss every level from {}",
        config.field_width,
        config.field_height,
        config.boss_level
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
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
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::error!("input thread stopped: {e}");
                break;
            }
        }
    });

    let result = run(&mut out, rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
