use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use my_diary::entry::DiaryEntry;
use my_diary::state::DiaryState;
use my_diary::store::EntryStore;
use my_diary::ui::{DetailAction, HomeAction, Ui};

#[derive(Parser)]
#[command(name = "my-diary", version, about = "A personal diary for the terminal")]
struct Cli {
    /// Path to the diary database (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

/// The four routes. Home is the default; detail is parameterized by the
/// entry id it was opened with.
enum Screen {
    Home,
    Compose,
    Detail(String),
    Stats,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    init_tracing(&db_path)?;

    // Schema initialization blocks everything else; if it fails the app
    // never becomes usable.
    let store = EntryStore::open(&db_path)
        .wrap_err_with(|| format!("failed to initialize diary database at {}", db_path.display()))?;

    let mut state = DiaryState::new(store);
    state.fetch();

    let mut ui = Ui::new()?;
    let mut screen = Screen::Home;

    loop {
        screen = match screen {
            Screen::Home => match ui.home(&state)? {
                HomeAction::Compose => Screen::Compose,
                HomeAction::Open(id) => Screen::Detail(id),
                HomeAction::Stats => Screen::Stats,
                HomeAction::Quit => break,
            },
            Screen::Compose => {
                if let Some(entry) = ui.compose()? {
                    if let Err(e) = state.create(entry) {
                        ui.alert(&format!("Failed to save entry: {e}"))?;
                    }
                }
                Screen::Home
            }
            Screen::Detail(id) => match ui.detail(&state, &id)? {
                DetailAction::Save { id, content } => {
                    // Content-only edit: date, category and image carry over.
                    if let Some(entry) = state.get(&id).cloned() {
                        let edited = DiaryEntry { content, ..entry };
                        if let Err(e) = state.update(edited) {
                            ui.alert(&format!("Failed to update entry: {e}"))?;
                        }
                    }
                    Screen::Detail(id)
                }
                DetailAction::Delete { id } => {
                    if let Err(e) = state.delete(&id) {
                        ui.alert(&format!("Failed to delete entry: {e}"))?;
                    }
                    Screen::Home
                }
                DetailAction::Back => Screen::Home,
            },
            Screen::Stats => {
                ui.stats(&state)?;
                Screen::Home
            }
        };
    }

    Ok(())
}

fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| eyre!("could not determine a data directory"))?;
    Ok(data_dir.join("my-diary").join("diary.db"))
}

/// The terminal belongs to the UI, so tracing goes to a log file beside the
/// database, and only when RUST_LOG asks for it.
fn init_tracing(db_path: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let log_path = db_path.with_extension("log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("failed to open {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
