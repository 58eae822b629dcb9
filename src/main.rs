//! jukebox - terminal remote for a shared Wi-Fi jukebox
//!
//! Polls the server's queue and lets anyone add, pause, skip, seek and replay.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use jukebox_remote::core::client::RemoteClient;
use jukebox_remote::core::dispatcher::Dispatcher;
use jukebox_remote::core::poller;
use jukebox_remote::core::refresh::Refresher;
use jukebox_remote::core::surface::{Controls, Surface};
use jukebox_remote::error::JukeboxError;
use jukebox_remote::storage::config::{self, validate};
use jukebox_remote::storage::identity::{load_identity, save_identity};
use jukebox_remote::types::{Command, Config, DispatchOutcome, HistoryItem, MenuItem};
use jukebox_remote::ui::input::{self, Input, HELP};
use jukebox_remote::ui::selector::create_selector;
use jukebox_remote::ui::terminal::{TerminalControls, TerminalSurface};
use jukebox_remote::utils::paths::{ensure_app_dirs, get_identity_path};

/// Terminal remote for a shared jukebox.
#[derive(Parser, Debug)]
#[command(name = "jukebox")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Jukebox server URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Poll period in milliseconds (overrides config)
    #[arg(long, global = true)]
    interval: Option<u64>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Live view with interactive commands (default)
    Watch,
    /// Show the queue once
    Status,
    /// Queue a search
    Add {
        /// Search text or URL
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,

        /// Play right after the current song
        #[arg(short, long)]
        next: bool,

        /// Allow age-restricted results for this add
        #[arg(long)]
        allow_age_restricted: bool,
    },
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip the current song
    Skip,
    /// Jump within the current song (seconds or M:SS)
    Seek { position: String },
    /// Search a history entry again by id
    Replay { id: String },
    /// Pick a history entry and replay it
    History,
    /// Print the name your adds are tagged with
    Whoami,
    /// Set the alias and emoji your adds are tagged with
    Identity {
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
    },
    /// Edit the configuration file
    Config,
}

/// Wiring shared by every command that talks to the server
struct Session {
    dispatcher: Arc<Dispatcher>,
    surface: Arc<TerminalSurface>,
    controls: Arc<TerminalControls>,
}

impl Session {
    async fn new(
        cfg: &Config,
        clear_screen: bool,
        allow_age_restricted: bool,
    ) -> Result<Self, JukeboxError> {
        let client = RemoteClient::new(&cfg.server_url)?;
        let surface = Arc::new(TerminalSurface::new(clear_screen));
        let controls =
            Arc::new(TerminalControls::load(allow_age_restricted, get_identity_path()).await);

        let display: Arc<dyn Surface> = surface.clone();
        let inputs: Arc<dyn Controls> = controls.clone();
        let refresher = Arc::new(Refresher::new(client, display));
        let dispatcher = Arc::new(Dispatcher::new(refresher, inputs));

        Ok(Self {
            dispatcher,
            surface,
            controls,
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Format a history entry for the picker
fn format_history_label(item: &HistoryItem) -> String {
    format!(
        "{} {} {}",
        item.title,
        format!("- {}", item.uploader).cyan(),
        format!("[{}]", item.id).dimmed()
    )
}

fn exit_code(outcome: &DispatchOutcome) -> ExitCode {
    match outcome {
        DispatchOutcome::Applied | DispatchOutcome::Ignored => ExitCode::SUCCESS,
        DispatchOutcome::Rejected(_) | DispatchOutcome::Failed(_) => ExitCode::FAILURE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    ensure_app_dirs().await?;

    let mut cfg = config::load_config().await?;
    if let Some(server) = cli.server.clone() {
        cfg.server_url = server;
    }
    if let Some(interval) = cli.interval {
        cfg.poll_interval_ms = interval;
    }
    validate(&cfg)?;
    debug!(server = %cfg.server_url, interval_ms = cfg.poll_interval_ms, "config loaded");

    let command = cli.command.unwrap_or(Cmd::Watch);
    match command {
        Cmd::Watch => {
            let session = Session::new(&cfg, true, cfg.allow_age_restricted).await?;
            watch(session, Duration::from_millis(cfg.poll_interval_ms)).await?;
            Ok(ExitCode::SUCCESS)
        }

        Cmd::Status => {
            let session = Session::new(&cfg, false, cfg.allow_age_restricted).await?;
            if session.dispatcher.refresher().refresh().await {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{} could not fetch {}/queue", "Error:".red(), cfg.server_url);
                Ok(ExitCode::FAILURE)
            }
        }

        Cmd::Add {
            query,
            next,
            allow_age_restricted,
        } => {
            let allow_age_restricted = cfg.allow_age_restricted || allow_age_restricted;
            let session = Session::new(&cfg, false, allow_age_restricted).await?;
            let query = query.join(" ");

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            spinner.set_message(format!("Looking up \"{}\"...", query.trim()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            // The server resolves the search before it answers
            let outcome = session.dispatcher.add(&query, next).await;
            spinner.finish_and_clear();

            if outcome == DispatchOutcome::Ignored {
                println!("{}", "Nothing to add.".yellow());
            }
            Ok(exit_code(&outcome))
        }

        Cmd::Play => one_shot(&cfg, Command::Play).await,
        Cmd::Pause => one_shot(&cfg, Command::Pause).await,
        Cmd::Skip => one_shot(&cfg, Command::Skip).await,
        Cmd::Seek { position } => {
            let Some(pos) = input::parse_position(&position) else {
                anyhow::bail!("invalid position {:?}, use seconds or M:SS", position);
            };
            one_shot(&cfg, Command::Seek { pos }).await
        }

        Cmd::Replay { id } => {
            let session = Session::new(&cfg, false, cfg.allow_age_restricted).await?;
            let outcome = session.dispatcher.replay(&id).await;
            if outcome == DispatchOutcome::Ignored {
                println!("{} {}", "No history entry with id".yellow(), id);
            }
            Ok(exit_code(&outcome))
        }

        Cmd::History => {
            let session = Session::new(&cfg, false, cfg.allow_age_restricted).await?;
            let snapshot = session.dispatcher.refresher().client().fetch_snapshot().await?;

            if snapshot.history.is_empty() {
                println!("{}", "No history yet.".yellow());
                return Ok(ExitCode::SUCCESS);
            }

            let menu_items: Vec<MenuItem<String>> = snapshot
                .history
                .iter()
                .rev()
                .map(|item| MenuItem {
                    label: format_history_label(item),
                    value: item.id.clone(),
                })
                .collect();

            let selector = create_selector(cfg.selector);
            let id = match selector.pick(&menu_items, "Replay") {
                Ok(id) => id,
                Err(JukeboxError::NoSelection) => return Ok(ExitCode::SUCCESS),
                Err(e) => return Err(e.into()),
            };

            let outcome = session.dispatcher.replay(&id).await;
            Ok(exit_code(&outcome))
        }

        Cmd::Whoami => {
            println!("{}", load_identity(&get_identity_path()).await.tag());
            Ok(ExitCode::SUCCESS)
        }

        Cmd::Identity { alias, emoji } => {
            let path = get_identity_path();
            if alias.is_none() && emoji.is_none() {
                println!("{}", load_identity(&path).await.tag());
                return Ok(ExitCode::SUCCESS);
            }

            let mut identity = load_identity(&path).await;
            if alias.is_some() {
                identity.alias = alias;
            }
            if emoji.is_some() {
                identity.emoji = emoji;
            }
            save_identity(&path, &identity).await?;
            println!("{} {}", "Adds are now tagged".green(), identity.tag());
            Ok(ExitCode::SUCCESS)
        }

        Cmd::Config => {
            config::edit_config(&cfg.editor).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Dispatch a playback command and show the resulting state
async fn one_shot(cfg: &Config, command: Command) -> anyhow::Result<ExitCode> {
    let session = Session::new(cfg, false, cfg.allow_age_restricted).await?;
    let outcome = session.dispatcher.dispatch(command).await;
    Ok(exit_code(&outcome))
}

/// Poll loop plus line input until quit, EOF or Ctrl-C
async fn watch(session: Session, period: Duration) -> anyhow::Result<()> {
    let poll = tokio::spawn(poller::run(
        Arc::clone(session.dispatcher.refresher()),
        period,
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match input::parse(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(input)) => handle_input(&session, input),
                    Ok(None) => {}
                    Err(message) => session.surface.notify(&message.yellow().to_string()),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poll.abort();
    println!("{}", "Bye.".dimmed());
    Ok(())
}

/// Turn one input into a background dispatch; never waits for the server
fn handle_input(session: &Session, input: Input) {
    let dispatcher = Arc::clone(&session.dispatcher);

    match input {
        Input::Add { query, play_next } => {
            let controls = Arc::clone(&session.controls);
            tokio::spawn(async move {
                controls.reload_identity().await;
                dispatcher.add(&query, play_next).await;
            });
        }
        Input::Replay(id) => {
            let controls = Arc::clone(&session.controls);
            tokio::spawn(async move {
                controls.reload_identity().await;
                dispatcher.replay(&id).await;
            });
        }
        Input::Play => spawn_dispatch(dispatcher, Command::Play),
        Input::Pause => spawn_dispatch(dispatcher, Command::Pause),
        Input::Skip => spawn_dispatch(dispatcher, Command::Skip),
        Input::Toggle => {
            let toggle = session
                .surface
                .current()
                .and_then(|regions| regions.now_playing.toggle());
            match toggle {
                Some(command) => spawn_dispatch(dispatcher, command),
                None => notify_warning(session, "Nothing playing, use play."),
            }
        }
        Input::Seek(pos) => {
            let slider = session
                .surface
                .current()
                .and_then(|regions| regions.now_playing.slider().copied());
            match slider {
                Some(slider) => spawn_dispatch(dispatcher, slider.seek_to(pos)),
                None => notify_warning(session, "Nothing playing to seek in."),
            }
        }
        Input::ToggleAgeRestricted => {
            let allowed = session.controls.toggle_age_restricted();
            let state = if allowed { "allowed" } else { "blocked" };
            let message = format!("Age-restricted results {}", state.bold());
            session.surface.notify(&message);
        }
        Input::Dismiss => session.surface.dismiss(),
        Input::Help => session.surface.notify(HELP),
        Input::Quit => {}
    }
}

fn notify_warning(session: &Session, message: &str) {
    session.surface.notify(&message.yellow().to_string());
}

fn spawn_dispatch(dispatcher: Arc<Dispatcher>, command: Command) {
    tokio::spawn(async move {
        dispatcher.dispatch(command).await;
    });
}
