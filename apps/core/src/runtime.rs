use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, ConfigError};
use crate::hotkey_runtime::{HotkeyRegistrar, NoopHotkeyRegistrar};
use crate::launcher::{HotkeyAction, Launcher, LauncherError};
use crate::logging::{self, LoggingError};
use crate::presentation::{Icon, Row};
use crate::snapshot::{SnapshotDirectory, SnapshotError};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Launcher(#[from] LauncherError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug, Default)]
#[command(name = "quickpurple")]
#[command(about = "Keyboard launcher for contacts, chats, statuses and unread messages")]
#[command(version)]
pub struct CliArgs {
    /// Config file (defaults to the app data directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Roster snapshot in JSON or JSON5; overrides `snapshot_path`
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Run one query, print its rows and exit; may be repeated
    #[arg(long = "query", value_name = "TEXT")]
    pub queries: Vec<String>,
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Open,
    Close,
    Up,
    Down,
    Submit,
    Hotkey(String),
    Quit,
    Query(String),
}

/// Recognizes the shell commands; any other line is the new query text.
pub fn parse_event(line: &str) -> ShellEvent {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line.trim_end() {
        ":open" => ShellEvent::Open,
        ":close" => ShellEvent::Close,
        ":up" => ShellEvent::Up,
        ":down" => ShellEvent::Down,
        ":go" => ShellEvent::Submit,
        ":quit" => ShellEvent::Quit,
        command => match command.strip_prefix(":hotkey ") {
            Some(spec) if !spec.trim().is_empty() => ShellEvent::Hotkey(spec.trim().to_string()),
            _ => ShellEvent::Query(line.to_string()),
        },
    }
}

pub fn run(args: CliArgs) -> Result<(), RuntimeError> {
    let config = config::load(args.config.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        println!(
            "[quickpurple] wrote default config to {}",
            config.config_path.display()
        );
    }
    let _logging = logging::init(&config)?;

    let snapshot_path = args.snapshot.clone().or_else(|| config.snapshot_path.clone());
    let collaborators = match snapshot_path {
        Some(path) => SnapshotDirectory::load(&path)?,
        None => {
            tracing::info!("no snapshot configured; using the built-in roster");
            SnapshotDirectory::deterministic_fixture()
        }
    };

    tracing::info!(
        hotkey = %config.hotkey,
        locale = %config.locale,
        config_path = %config.config_path.display(),
        "startup"
    );
    let mut launcher = Launcher::new(config, collaborators, NoopHotkeyRegistrar::default())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if !args.queries.is_empty() {
        return run_queries(&mut launcher, &args.queries, &mut out);
    }

    let stdin = std::io::stdin();
    run_shell(&mut launcher, stdin.lock(), &mut out)
}

/// Opens one session, prints the rows for each query in turn and closes it.
pub fn run_queries<R: HotkeyRegistrar, W: Write>(
    launcher: &mut Launcher<SnapshotDirectory, R>,
    queries: &[String],
    out: &mut W,
) -> Result<(), RuntimeError> {
    launcher.open();
    for query in queries {
        launcher.on_query_changed(query)?;
        writeln!(out, "query: {query}")?;
        render(launcher, out)?;
    }
    launcher.close();
    Ok(())
}

/// Line-driven stand-in for the search window. Returns on `:quit`, end of
/// input or after the quit action has been activated.
pub fn run_shell<R: HotkeyRegistrar, I: BufRead, W: Write>(
    launcher: &mut Launcher<SnapshotDirectory, R>,
    input: I,
    out: &mut W,
) -> Result<(), RuntimeError> {
    writeln!(
        out,
        "[quickpurple] {} opens the launcher; :open :close :up :down :go :hotkey <keys> :quit",
        launcher.binding().hotkey()
    )?;

    for line in input.lines() {
        match parse_event(&line?) {
            ShellEvent::Open => match launcher.on_hotkey() {
                HotkeyAction::Opened => render(launcher, out)?,
                HotkeyAction::Closed => writeln!(out, "[quickpurple] closed")?,
            },
            ShellEvent::Close => {
                if launcher.on_escape() {
                    writeln!(out, "[quickpurple] closed")?;
                }
            }
            ShellEvent::Up => move_and_render(launcher, -1, out)?,
            ShellEvent::Down => move_and_render(launcher, 1, out)?,
            ShellEvent::Submit => match launcher.submit() {
                Ok(()) => {
                    writeln!(out, "[quickpurple] activated")?;
                    if launcher.collaborators().quit_requested() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "submit failed");
                    writeln!(out, "[quickpurple] {error}")?;
                }
            },
            ShellEvent::Hotkey(spec) => match launcher.rebind_hotkey(&spec) {
                Ok(()) => writeln!(
                    out,
                    "[quickpurple] hotkey bound to {}",
                    launcher.binding().hotkey()
                )?,
                Err(error) => writeln!(out, "[quickpurple] {error}")?,
            },
            ShellEvent::Quit => break,
            ShellEvent::Query(text) => {
                launcher.open();
                launcher.on_query_changed(&text)?;
                render(launcher, out)?;
            }
        }
    }

    launcher.close();
    Ok(())
}

fn move_and_render<R: HotkeyRegistrar, W: Write>(
    launcher: &mut Launcher<SnapshotDirectory, R>,
    direction: i32,
    out: &mut W,
) -> Result<(), RuntimeError> {
    match launcher.move_selection(direction) {
        Ok(_) => render(launcher, out),
        Err(error) => {
            writeln!(out, "[quickpurple] {error}")?;
            Ok(())
        }
    }
}

fn render<R: HotkeyRegistrar, W: Write>(
    launcher: &Launcher<SnapshotDirectory, R>,
    out: &mut W,
) -> Result<(), RuntimeError> {
    let selected = launcher.session().map(|session| session.selected_index());
    let rows = launcher.rows();
    if rows.is_empty() {
        writeln!(out, "  (no results)")?;
        return Ok(());
    }

    let max_rows = launcher.config().max_rows as usize;
    for (position, row) in rows.iter().enumerate().take(max_rows) {
        let marker = if Some(position) == selected { '>' } else { ' ' };
        writeln!(out, "{marker} {}", format_row(row))?;
    }
    if rows.len() > max_rows {
        writeln!(out, "  ... {} more", rows.len() - max_rows)?;
    }
    Ok(())
}

fn format_row(row: &Row) -> String {
    match row.icon {
        Some(Icon::Presence(primitive)) => format!("[{}] {}", primitive.id(), row.text),
        Some(Icon::Stock(icon)) => format!("[{icon}] {}", row.text),
        None => row.text.clone(),
    }
}
