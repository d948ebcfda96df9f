//! # Checkin - attendance check-in client
//!
//! Terminal front end for the attendance engine: shows the identity
//! challenge, registers check-ins, and pages through the history.
//!
//! ## Flow
//! ```text
//! session.json → challenge → digits → attendance service → history
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use asistencia_common::{DigitSlot, Notice};
use checkin::challenge::{IndexSource, SystemRandom};
use checkin::config::{AppConfig, ConfigOverrides};
use checkin::report;
use checkin::service::{AttendanceService, HttpAttendanceService};
use checkin::session::SessionStore;
use checkin::SubmissionCoordinator;

/// Attendance check-in client
#[derive(Parser, Debug)]
#[command(name = "checkin")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/checkin.toml")]
    config: String,

    /// Attendance service URL (overrides config)
    #[arg(long, env = "ATTENDANCE_API_URL")]
    api_url: Option<String>,

    /// Session store written by the login flow (overrides config)
    #[arg(long, env = "ATTENDANCE_SESSION")]
    session: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the attendance history
    History {
        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Answer the identity challenge and register attendance
    CheckIn,
    /// Forget the stored session
    Logout,
}

type Coordinator = SubmissionCoordinator<HttpAttendanceService, SystemRandom>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    let overrides = ConfigOverrides {
        api_url: args.api_url.clone(),
        session_path: args.session.clone(),
    };
    let config = AppConfig::load(&args.config, &overrides)?;
    let session_path = PathBuf::from(&config.session_path);

    // `None` means check-in mode
    let history_page = match args.command {
        Command::Logout => {
            SessionStore::clear(&session_path).context("Failed to remove session store")?;
            info!(path = ?session_path, "Session cleared");
            println!("Sesión cerrada");
            return Ok(());
        }
        Command::History { page } => Some(page),
        Command::CheckIn => None,
    };

    let session = match SessionStore::load(&session_path).session() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", report::notice(&Notice::from(&e)));
            return Err(e).context("Cannot open the attendance view");
        }
    };

    let service = HttpAttendanceService::new(config.api_base_url.clone(), config.request_timeout())
        .context("Failed to build HTTP client")?;
    let mut coordinator = SubmissionCoordinator::open(
        session,
        service,
        SystemRandom::new(),
        config.coordinator_settings(),
    )?;

    println!("{}", report::header(coordinator.session(), coordinator.opened_at()));

    if coordinator.refresh().await.is_err() {
        print_notice(&mut coordinator);
    }

    match history_page {
        Some(page) => {
            coordinator.seek_page(page.saturating_sub(1));
            print!("{}", report::page(&coordinator.page()));
        }
        None => check_in(&mut coordinator).await?,
    }

    Ok(())
}

/// Prompt for digits until a check-in is accepted or stdin closes
async fn check_in(coordinator: &mut Coordinator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let challenge = coordinator.challenge();
        println!("{}", report::challenge(&challenge));

        let Some(first) = prompt(&mut lines, challenge.position_a()).await? else {
            break;
        };
        let Some(second) = prompt(&mut lines, challenge.position_b()).await? else {
            break;
        };

        coordinator.set_digit(DigitSlot::First, &first);
        coordinator.set_digit(DigitSlot::Second, &second);

        match coordinator.submit().await {
            Ok(()) => {
                print_notice(coordinator);
                if coordinator.settle().await.is_err() {
                    print_notice(coordinator);
                }
                print!("{}", report::page(&coordinator.page()));
                break;
            }
            Err(e) if e.is_recoverable() => print_notice(coordinator),
            Err(e) => return Err(e).context("Check-in aborted"),
        }
    }

    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, position: usize) -> Result<Option<String>> {
    print!("Dígito en la posición {}: ", position);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let line = lines.next_line().await.context("Failed to read stdin")?;
    Ok(line.map(|l| l.trim().to_string()))
}

fn print_notice<S: AttendanceService, R: IndexSource>(coordinator: &mut SubmissionCoordinator<S, R>) {
    if let Some(notice) = coordinator.take_notice() {
        println!("{}", report::notice(&notice));
    }
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
