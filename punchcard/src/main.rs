//! punchcard - work session tracker
//!
//! Start and finish named work sessions, and review multi-period statistics
//! in a terminal dashboard.

mod app;
mod ui;

use std::io;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use punchcard_core::format::format_duration;
use punchcard_core::sessions::{self, FinishOutcome};
use punchcard_core::{Config, Database, Period};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

#[derive(Parser)]
#[command(name = "punchcard", version, about = "Track work sessions and review statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start recording a session
    #[command(visible_alias = "go")]
    Start {
        /// Optional session name; sessions with the same name may overlap
        name: Option<String>,
    },
    /// Finish active sessions
    #[command(visible_alias = "stop")]
    Finish {
        /// Session name to finish; empty or "all" finishes every active session
        name: Option<String>,
    },
    /// Show currently running sessions
    #[command(visible_alias = "running")]
    Status,
    /// Open the statistics dashboard
    Stats {
        /// Initial period tab: today, day, week, month or year
        period: Option<String>,
    },
    /// List every recorded session
    Log,
    /// Delete all recorded sessions
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;

    // Logging goes to a file, never to the terminal the dashboard owns
    let _log_guard = punchcard_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    // Validate the period selector before the store is touched
    let initial_period = match &cli.command {
        Command::Stats { period } => Some(
            period
                .as_deref()
                .unwrap_or("")
                .parse::<Period>()
                .context("expected one of: today, day, week, month, year")?,
        ),
        _ => None,
    };

    let db_path = config.database_path();
    tracing::debug!(path = %db_path.display(), "Opening database");
    let db = Database::open(
        &db_path,
        StdDuration::from_secs(config.database.busy_timeout_secs),
    )
    .context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match cli.command {
        Command::Start { name } => cmd_start(&db, name.as_deref().unwrap_or("")),
        Command::Finish { name } => cmd_finish(&db, name.as_deref().unwrap_or("")),
        Command::Status => cmd_status(&db),
        Command::Stats { .. } => cmd_stats(&db, initial_period.unwrap_or(Period::All)),
        Command::Log => cmd_log(&db),
        Command::Reset => cmd_reset(&db),
    }
}

fn cmd_start(db: &Database, name: &str) -> Result<()> {
    remind_active(db)?;

    let started = sessions::start_session(db, name).context("failed to start session")?;
    let at = started.start.with_timezone(&Local).format("%H:%M:%S");
    if name.is_empty() {
        println!("{}", format!("Started recording ({at})").green());
    } else {
        println!("{}", format!("Started recording '{name}' ({at})").green());
    }
    Ok(())
}

fn cmd_finish(db: &Database, name: &str) -> Result<()> {
    let outcome = sessions::finish_sessions(db, name).context("failed to finish sessions")?;

    match outcome {
        FinishOutcome::NothingRunning => {
            // Reportable outcome, not an error
            if name.is_empty() || name == sessions::FINISH_ALL {
                println!("{}", "No sessions running".red());
            } else {
                println!("{}", format!("No active sessions named '{name}'").red());
            }
        }
        FinishOutcome::Finished { duration } => {
            let after = duration
                .map(|d| format!(" after {}", format_duration(d, 2)))
                .unwrap_or_default();
            if name.is_empty() || name == sessions::FINISH_ALL {
                println!("{}", format!("Stopped recording{after}").green());
            } else {
                println!("{}", format!("Stopped recording '{name}'{after}").green());
            }
        }
        FinishOutcome::FinishedMany { count } => {
            if name.is_empty() || name == sessions::FINISH_ALL {
                println!("{}", format!("Stopped recording for {count} sessions").green());
            } else {
                println!(
                    "{}",
                    format!("Stopped recording for {count} sessions named '{name}'").green()
                );
            }
        }
    }

    remind_active(db)
}

fn cmd_status(db: &Database) -> Result<()> {
    let active = db.active_sessions().context("failed to list sessions")?;
    if active.is_empty() {
        println!("No sessions currently running.");
        return Ok(());
    }

    let now = Utc::now();
    for session in active {
        let elapsed = format_duration(now - session.start, 2).green();
        if session.name.is_empty() {
            println!("[{}] running for {elapsed}", session.id);
        } else {
            println!("[{} - {}] running for {elapsed}", session.id, session.name);
        }
    }
    Ok(())
}

fn cmd_log(db: &Database) -> Result<()> {
    let sessions = db.all_sessions().context("failed to list sessions")?;
    for session in sessions {
        let start = session.start.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let finish = match session.finish {
            Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => "active".yellow().to_string(),
        };
        println!(
            "{:>4}  {:<20}  {}  {}",
            session.id,
            session.display_name(),
            start,
            finish
        );
    }
    Ok(())
}

fn cmd_reset(db: &Database) -> Result<()> {
    db.reset().context("failed to reset the session store")?;
    println!("All sessions deleted.");
    Ok(())
}

/// Print a reminder when sessions are still running.
fn remind_active(db: &Database) -> Result<()> {
    let n = db.num_active().context("failed to count active sessions")?;
    if n == 1 {
        println!("{}", "Reminder: 1 session currently running".yellow());
    } else if n > 1 {
        println!("{}", format!("Reminder: {n} sessions currently running").yellow());
    }
    Ok(())
}

/// Open the dashboard: build every page once, then run the input loop with
/// guaranteed terminal restore.
fn cmd_stats(db: &Database, initial: Period) -> Result<()> {
    let mut app = App::load(db, initial).context("failed to aggregate statistics")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_dashboard(&mut terminal, &mut app);

    // Restore terminal even when the loop failed
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

/// The dashboard loop: draw the active page, then block on the next key.
/// No timers, no background refresh; only a quit key ends the loop.
fn run_dashboard(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read().context("failed to read input event")? {
            app.handle_key(key);
        }

        if app.should_quit {
            tracing::debug!("Dashboard closed");
            return Ok(());
        }
    }
}
