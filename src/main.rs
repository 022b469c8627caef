use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;
use tracing::info;

use geometric_barrage::app::App;
use geometric_barrage::audio::AudioManager;
use geometric_barrage::config::Cli;
use geometric_barrage::high_scores::FileStore;
use geometric_barrage::input::InputManager;
use geometric_barrage::logging;
use geometric_barrage::session::Session;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.log_path(), &cli.log_level)?;
    info!(data_dir = %cli.resolve_data_dir().display(), "Starting geometric-barrage");

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!(supports_keyboard_enhancement, "Keyboard enhancement support");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let store = FileStore::open(cli.scores_path());
    info!(path = %store.path().display(), "High score file");
    let session = Session::new(Box::new(store), rng);
    let audio_manager = if cli.mute {
        AudioManager::muted()
    } else {
        AudioManager::new()
    };
    let app = App::new(
        session,
        InputManager::new(supports_keyboard_enhancement),
        audio_manager,
    )
    .with_start_stage(cli.start_stage());

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Cleanup runs before any error from the game loop is reported
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
