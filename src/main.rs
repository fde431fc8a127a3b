use std::env;
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

mod api;
mod config;
mod errors;
mod model;
mod pagination;
mod session;
mod theme;
mod transcript;
mod ui;
mod ui_analysis;

use api::ApiClient;
use model::{AppEvent, AppState};
use pagination::{FetchRequest, TRANSCRIPTIONS_PATH};
use session::Session;

const ANALYSIS_SCROLL_STEP: i32 = 5;

enum FetchTask {
    Page(FetchRequest),
    Profile,
}

enum KeyOutcome {
    Continue,
    Quit,
    Fetch(FetchTask),
    TranscriptToggled(bool),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli()?;
    init_tracing(&cli)?;

    // Keep the on-disk copy separate so env/CLI secrets never get saved.
    let mut file_cfg = match config::load() {
        Ok(c) => c,
        Err(err) => {
            eprintln!("Failed to load config: {err:?}. Using defaults.");
            config::AppConfig::default()
        }
    };
    let app_cfg = file_cfg.clone().with_env_overrides();

    let token = cli.token.clone().or_else(|| app_cfg.token.clone());
    let session = Session::new(&app_cfg.api_base_url, token)
        .with_context(|| format!("invalid API base URL {}", app_cfg.api_base_url))?;
    let client = ApiClient::new(session, app_cfg.request_timeout())
        .context("failed to build HTTP client")?;
    info!(base_url = %client.session().base_url(), "API session ready");
    if !client.session().is_authenticated() {
        warn!("No API token configured; requests will be sent without credentials");
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let (mut state, initial_fetch) = AppState::mount(&cli.location(), app_cfg.show_transcription);
    spawn_fetch(FetchTask::Page(initial_fetch), &client, &tx);
    spawn_fetch(FetchTask::Profile, &client, &tx);

    // TUI init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // App loop
    let tick = Duration::from_millis(100);
    let mut last_draw: Option<Instant> = None;
    let mut running = true;

    while running {
        // Drain finished fetches into state
        while let Ok(evt) = rx.try_recv() {
            state.apply(evt);
            last_draw = None;
        }

        if last_draw.map_or(true, |at| at.elapsed() >= tick) {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_draw = Some(Instant::now());
        }

        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                match handle_key(&mut state, key) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => running = false,
                    KeyOutcome::Fetch(task) => spawn_fetch(task, &client, &tx),
                    KeyOutcome::TranscriptToggled(show) => {
                        file_cfg.show_transcription = show;
                        if let Err(err) = config::save(&file_cfg) {
                            warn!(error = ?err, "Failed to save config");
                        }
                    }
                }
                last_draw = None;
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }
    let panel = &mut state.transcriptions;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if panel.close_analysis() {
                KeyOutcome::Continue
            } else {
                KeyOutcome::Quit
            }
        }
        KeyCode::Up => {
            panel.move_cursor(-1);
            KeyOutcome::Continue
        }
        KeyCode::Down => {
            panel.move_cursor(1);
            KeyOutcome::Continue
        }
        KeyCode::Enter => {
            panel.toggle_analysis();
            KeyOutcome::Continue
        }
        KeyCode::PageUp => {
            panel.scroll_analysis(-ANALYSIS_SCROLL_STEP);
            KeyOutcome::Continue
        }
        KeyCode::PageDown => {
            panel.scroll_analysis(ANALYSIS_SCROLL_STEP);
            KeyOutcome::Continue
        }
        KeyCode::Char('t') => {
            panel.show_transcription = !panel.show_transcription;
            KeyOutcome::TranscriptToggled(panel.show_transcription)
        }
        KeyCode::Right | KeyCode::Char('n') => match state.next_page() {
            Some(fetch) => KeyOutcome::Fetch(FetchTask::Page(fetch)),
            None => KeyOutcome::Continue,
        },
        KeyCode::Left | KeyCode::Char('p') => match state.previous_page() {
            Some(fetch) => KeyOutcome::Fetch(FetchTask::Page(fetch)),
            None => KeyOutcome::Continue,
        },
        KeyCode::Char('r') => KeyOutcome::Fetch(FetchTask::Page(state.reload())),
        _ => KeyOutcome::Continue,
    }
}

fn spawn_fetch(task: FetchTask, client: &ApiClient, tx: &mpsc::UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    match task {
        FetchTask::Page(request) => {
            tokio::spawn(async move {
                let result = client.fetch_transcriptions(request.page).await;
                let _ = tx.send(AppEvent::PageLoaded {
                    token: request.token,
                    result,
                });
            });
        }
        FetchTask::Profile => {
            tokio::spawn(async move {
                let result = client.fetch_profile().await;
                let _ = tx.send(AppEvent::ProfileLoaded { result });
            });
        }
    }
}

#[derive(Debug, Default)]
struct CliArgs {
    debug: Option<DebugTarget>,
    page: Option<String>,
    location: Option<String>,
    token: Option<String>,
}

#[derive(Debug, PartialEq)]
enum DebugTarget {
    Default,
    Path(PathBuf),
}

impl CliArgs {
    fn location(&self) -> String {
        if let Some(location) = &self.location {
            return location.clone();
        }
        match &self.page {
            Some(page) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("page", page)
                    .finish();
                format!("{TRANSCRIPTIONS_PATH}?{query}")
            }
            None => TRANSCRIPTIONS_PATH.to_string(),
        }
    }
}

fn parse_cli() -> Result<CliArgs> {
    parse_args(env::args().skip(1))
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        if arg == "--debug" {
            if cli.debug.is_some() {
                bail!("`--debug` specified more than once");
            }
            let path = args.next_if(|next| !next.starts_with('-'));
            cli.debug = Some(match path {
                Some(path) => DebugTarget::Path(PathBuf::from(path)),
                None => DebugTarget::Default,
            });
        } else if let Some(rest) = arg.strip_prefix("--debug=") {
            if cli.debug.is_some() {
                bail!("`--debug` specified more than once");
            }
            if rest.is_empty() {
                cli.debug = Some(DebugTarget::Default);
            } else {
                cli.debug = Some(DebugTarget::Path(PathBuf::from(rest)));
            }
        } else if let Some((flag, value)) = split_valued(&arg, &mut args)? {
            let slot = match flag {
                "--page" => &mut cli.page,
                "--location" => &mut cli.location,
                "--token" => &mut cli.token,
                _ => unreachable!("split_valued only returns known flags"),
            };
            if slot.is_some() {
                bail!("`{flag}` specified more than once");
            }
            *slot = Some(value);
        } else {
            bail!("unknown argument: {arg}");
        }
    }

    if cli.page.is_some() && cli.location.is_some() {
        bail!("`--page` and `--location` cannot be combined");
    }

    Ok(cli)
}

/// Accepts `--flag value` and `--flag=value` for flags that take a value.
fn split_valued<I>(
    arg: &str,
    rest: &mut std::iter::Peekable<I>,
) -> Result<Option<(&'static str, String)>>
where
    I: Iterator<Item = String>,
{
    for flag in ["--page", "--location", "--token"] {
        if arg == flag {
            let Some(value) = rest.next() else {
                bail!("`{flag}` requires a value");
            };
            return Ok(Some((flag, value)));
        }
        if let Some(value) = arg.strip_prefix(flag).and_then(|v| v.strip_prefix('=')) {
            return Ok(Some((flag, value.to_string())));
        }
    }
    Ok(None)
}

fn init_tracing(cli: &CliArgs) -> Result<()> {
    if let Some(target) = &cli.debug {
        let log_path = match target {
            DebugTarget::Default => config::config_dir().join("debug.log"),
            DebugTarget::Path(path) => path.clone(),
        };

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("failed to open log file {}", log_path.display()))?;

        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_max_level(LevelFilter::DEBUG);

        subscriber.try_init().map_err(|err| {
            anyhow::anyhow!(
                "failed to initialize logging to {}: {}",
                log_path.display(),
                err
            )
        })?;
    }

    Ok(())
}
