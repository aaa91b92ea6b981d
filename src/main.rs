//! Turkey Quest - Entry Point
//!
//! Bootstraps the config file and save slots, then hands the terminal to
//! the game until the player quits from the title screen.

use std::fs::{self, OpenOptions};
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use turkey_quest::data::{data_directory, GameConfig, ProviderKind};
use turkey_quest::game::Game;
use turkey_quest::save::AUTO_SAVE_SLOT;
use turkey_quest::ui::App;

const TARGET_FPS: u64 = 30;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns raw mode and the alternate screen; both are released on drop,
/// including when the loop bails out with an error.
struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            log::warn!("Could not leave raw mode: {}", e);
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            log::warn!("Could not leave alternate screen: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

fn init_logging() {
    // The TUI owns stdout, so records go to a file next to the saves
    let dir = data_directory();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Could not create {}: {}", dir.display(), e);
    }
    let target = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dir.join("turkey-quest.log"))
    {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Pipe(Box::new(io::sink())),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(target)
        .init();
}

/// Load (or write on first run) the config and build the game around it
fn bootstrap() -> Game {
    let config = GameConfig::load();
    match &config.provider {
        ProviderKind::Fallback => log::info!("Enemies: built-in roster"),
        ProviderKind::Lua { script } => log::info!("Enemies: script {}", script.display()),
    }
    if let Some(seed) = config.rng_seed {
        log::info!("Fixed RNG seed {}", seed);
    }

    let save_dir = config.save_directory();
    if let Err(e) = fs::create_dir_all(&save_dir) {
        log::warn!("Save directory {} unavailable: {}", save_dir.display(), e);
    }

    let game = Game::from_config(&config);
    let slots = game.slot_summaries();
    let filled = slots.iter().filter(|(_, s)| s.is_some()).count();
    log::info!("{} of {} save slots in use at {}", filled, slots.len(), save_dir.display());
    if let Some((_, Some(auto))) = slots.iter().find(|(slot, _)| *slot == AUTO_SAVE_SLOT) {
        log::info!("Auto-save: {} (level {}) at {}", auto.name, auto.level, auto.label);
    }
    game
}

fn main() -> Result<()> {
    init_logging();
    log::info!("Starting Turkey Quest v{}", env!("CARGO_PKG_VERSION"));

    let mut game = bootstrap();
    let mut app = App::new();

    let result = {
        let mut guard = TerminalGuard::enter()?;
        run_game_loop(&mut guard.terminal, &mut app, &mut game)
    };

    // Closing the window mid-adventure lands the hero in the auto-save slot
    if game.in_session() {
        game.return_to_title();
        log::info!("Session stored in slot {}", AUTO_SAVE_SLOT);
    }

    if let Err(ref e) = result {
        log::error!("Game exited with error: {:#}", e);
        eprintln!("Error: {:#}", e);
    }

    log::info!("Turkey Quest shut down cleanly");
    result
}

fn run_game_loop(terminal: &mut Tui, app: &mut App, game: &mut Game) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, game) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        // Timers, pending generation and passive tiles advance on wall time
        game.update(delta);

        terminal.draw(|frame| app.render(frame, game))?;

        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }

    Ok(())
}
