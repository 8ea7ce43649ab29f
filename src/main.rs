//! Sunflower CLI - Lightweight daily check-in client
//!
//! A terminal client for the Sunflower check-in and points service.

mod api;
mod auth;
mod cache;
mod config;
mod models;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::adapter::{Adapter, SharedAdapter};
use api::client::HttpClient;
use auth::{StorageTier, TokenStore};
use cache::Cache;
use models::CreateUserRequest;
use state::{CheckinState, SessionState};

#[derive(Parser)]
#[command(name = "sunflower-cli")]
#[command(about = "Lightweight CLI client for the Sunflower check-in service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Log in with username and password
    Login {
        username: String,
        password: String,

        /// Keep the session across terminal sessions
        #[arg(short, long)]
        remember: bool,
    },

    /// Log out and clear stored credentials
    Logout,

    /// Show current session status
    Status,

    /// Show the logged-in account
    Whoami,

    /// Check in for today
    Checkin,

    /// Make up a missed day
    Retro {
        /// Date to make up, YYYY-MM-DD
        date: String,
    },

    /// Show one month's check-in calendar
    Calendar {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// Show the points overview
    Points,

    /// Show the points transaction history
    Records {
        /// Maximum number of records to show
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Number of records to skip
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = config::ApiConfig::load()?;
    let durable = Arc::new(storage::FileStore::open_default()?);
    let ephemeral = Arc::new(storage::MemoryStore::new());
    let tokens = TokenStore::new(durable, ephemeral);
    let client = HttpClient::new(&config, tokens.clone())?;

    let cache = Cache::new();
    cache.spawn_cleanup(cache::CLEANUP_INTERVAL);

    let adapter: SharedAdapter = Arc::new(Adapter::new(client, cache, tokens));
    let mut session = SessionState::new(adapter.clone());
    let mut checkins = CheckinState::new(adapter.clone());

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let request = CreateUserRequest {
                username,
                email,
                confirm_password: password.clone(),
                password,
            };
            let user = session.register(&request).await?;
            println!("Account created: {}", user.username);
            if let Some(id) = user.id {
                println!("User id: {}", id);
            }
            println!("You are logged in for this terminal session only.");
            println!("Use `sunflower-cli login --remember` to stay logged in.");
        }
        Commands::Login {
            username,
            password,
            remember,
        } => {
            let user = session.login(&username, &password, remember).await?;
            println!("Logged in as {}", user.username);
            if !remember {
                println!("Session is not persisted; pass --remember to keep it.");
            }
        }
        Commands::Logout => {
            session.logout();
            checkins.reset();
            println!("Logged out.");
        }
        Commands::Status => {
            status(&adapter);
        }
        Commands::Whoami => {
            whoami(&mut session).await;
        }
        Commands::Checkin => {
            if require_login(&mut session).await {
                check_in(&mut checkins).await;
            }
        }
        Commands::Retro { date } => {
            if require_login(&mut session).await {
                retro(&mut checkins, &date).await?;
            }
        }
        Commands::Calendar { year, month } => {
            if require_login(&mut session).await {
                let now = Local::now();
                let year = year.unwrap_or_else(|| now.year());
                let month = month.unwrap_or_else(|| now.month());
                anyhow::ensure!((1..=12).contains(&month), "month must be 1 through 12");
                calendar(&mut checkins, year, month).await;
            }
        }
        Commands::Points => {
            if require_login(&mut session).await {
                points(&mut checkins).await;
            }
        }
        Commands::Records { limit, offset } => {
            if require_login(&mut session).await {
                records(&adapter, limit, offset).await;
            }
        }
    }

    Ok(())
}

/// Restore the session; print a hint and return false when logged out.
async fn require_login(session: &mut SessionState) -> bool {
    session.init().await;
    if session.is_logged_in() {
        true
    } else {
        println!("Not logged in. Use `sunflower-cli login` first.");
        false
    }
}

fn status(adapter: &SharedAdapter) {
    let stats = adapter.token_stats();
    match stats.tier {
        StorageTier::None => println!("Not logged in."),
        tier => {
            println!("Logged in: yes");
            println!("  access token:  {}", mark(stats.has_access_token));
            println!("  refresh token: {}", mark(stats.has_refresh_token));
            println!(
                "  storage:       {}",
                match tier {
                    StorageTier::Durable => "on disk (remember me)",
                    _ => "this terminal session only",
                }
            );
        }
    }
}

fn mark(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "missing"
    }
}

async fn whoami(session: &mut SessionState) {
    session.init().await;
    match session.current_user() {
        Some(user) => {
            println!("Username: {}", user.username);
            if let Some(id) = user.id {
                println!("User id:  {}", id);
            }
            if !user.email.is_empty() {
                println!("Email:    {}", user.email);
            }
        }
        None => println!("Not logged in."),
    }
}

async fn check_in(checkins: &mut CheckinState) {
    let outcome = checkins.check_in().await;
    if outcome.success {
        println!("{} (about +{} points)", outcome.message, outcome.points);
        let info = checkins.points_info();
        println!(
            "Total points: {}, streak: {} day(s)",
            info.total_points, info.consecutive_days
        );
    } else {
        println!("{}", outcome.message);
    }
}

async fn retro(checkins: &mut CheckinState, date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date {:?}, expected YYYY-MM-DD", date))?;

    let outcome = checkins.retro_check_in(date).await;
    if outcome.success {
        println!("{}", outcome.message);
        let info = checkins.points_info();
        println!("Retro check-ins remaining: {}", info.retro_available);
    } else {
        println!("{}", outcome.message);
    }
    Ok(())
}

async fn calendar(checkins: &mut CheckinState, year: i32, month: u32) {
    let calendar = checkins.fetch_calendar(year, month).await;
    let detail = &calendar.detail;

    println!("Check-in calendar {}-{:02}", calendar.year, calendar.month);
    println!("  checked in: {}", day_list(&detail.checked_in_days));
    println!("  retro:      {}", day_list(&detail.retro_checked_in_days));
    println!(
        "  today:      {}",
        if detail.is_checked_in_today {
            "checked in"
        } else {
            "not yet"
        }
    );
    println!("  streak:     {} day(s)", detail.consecutive_days);
    println!("  retro left: {}", detail.remain_retro_times);
}

fn day_list(days: &[u32]) -> String {
    if days.is_empty() {
        "none".to_string()
    } else {
        days.iter()
            .map(|day| day.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

async fn points(checkins: &mut CheckinState) {
    let info = checkins.fetch_points_info().await;
    println!("Total points:     {}", info.total_points);
    println!("Streak:           {} day(s)", info.consecutive_days);
    println!(
        "Checked in today: {}",
        if info.checked_in_today { "yes" } else { "no" }
    );
    println!("Retro remaining:  {}", info.retro_available);
}

async fn records(adapter: &SharedAdapter, limit: u32, offset: u32) {
    let page = adapter.points_records(limit, offset).await;
    if page.list.is_empty() {
        println!("No points records.");
        return;
    }

    println!(
        "Points history ({} of {}):",
        page.list.len(),
        page.total
    );
    for record in &page.list {
        println!(
            "  {}  {:>4}  {:<14} {}",
            record.transaction_time,
            format!("{:+}", record.points_change),
            record.transaction_type.to_string(),
            record.description
        );
    }
    if page.has_more {
        println!(
            "  ... more available, try --offset {}",
            offset + page.list.len() as u32
        );
    }
}
