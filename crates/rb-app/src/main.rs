//! room-booking: Room booking client
//!
//! Usage:
//!   room-booking rooms          - List room types
//!   room-booking whoami         - Show LINE profile
//!   room-booking book [options] - Log in with LINE and book a room
//!   room-booking --help         - Show help

mod args;

use std::sync::Arc;

use anyhow::Context;
use rb_booking::BookingClient;
use rb_core::{BookingPayload, Config};
use rb_line::{IdentityBootstrap, InitOutcome, LineSdk};
use tracing_subscriber::EnvFilter;

use crate::args::{BookArgs, RunMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = args::parse_args(std::env::args().skip(1))?;

    match mode {
        RunMode::Help => {
            args::print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("room-booking {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Booking backend: {}", config.api.base_url);

    match mode {
        RunMode::Rooms => list_rooms(&config).await,
        RunMode::Whoami => whoami(&config).await,
        RunMode::Book(book) => book_room(&config, book).await,
        RunMode::Help | RunMode::Version => Ok(()),
    }
}

/// Identity bootstrap for this run. One per process, like one per page load.
fn identity(config: &Config) -> anyhow::Result<IdentityBootstrap> {
    let sdk = LineSdk::new(&config.line)
        .context("Failed to create LINE SDK")?
        .with_redirect_hook(Arc::new(|url: &str| {
            println!("Please log in with LINE:");
            println!("  {}", url);
            println!("Then set LINE_ACCESS_TOKEN and run the command again.");
        }));

    Ok(IdentityBootstrap::from_config(Arc::new(sdk), &config.line))
}

async fn list_rooms(config: &Config) -> anyhow::Result<()> {
    let client = BookingClient::new(&config.api)?;
    let rooms = client.fetch_rooms().await?;

    println!("{:<8} {:<24} {:>6} {:>9}", "CODE", "NAME", "ROOMS", "CAPACITY");
    for room in rooms {
        let capacity = room
            .capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:<24} {:>6} {:>9}", room.code, room.name, room.total_rooms, capacity);
    }

    Ok(())
}

async fn whoami(config: &Config) -> anyhow::Result<()> {
    let identity = identity(config)?;

    if identity.init_liff().await? == InitOutcome::LoginRedirect {
        return Ok(());
    }

    let profile = identity.get_profile().await?;
    println!("User ID:      {}", profile.user_id);
    println!("Display name: {}", profile.display_name);
    println!("In LINE app:  {}", identity.is_in_client());

    Ok(())
}

async fn book_room(config: &Config, book: BookArgs) -> anyhow::Result<()> {
    let identity = identity(config)?;

    // The login redirect abandons the booking
    if identity.init_liff().await? == InitOutcome::LoginRedirect {
        return Ok(());
    }

    let profile = identity.get_profile().await?;

    let payload = BookingPayload::new(book.check_in, book.check_out, book.room, book.people)
        .with_guest(book.name, book.phone)
        .with_pickup(book.pickup)
        .with_line_user(profile.user_id, profile.display_name);

    let client = BookingClient::new(&config.api)?;
    let created = client.create_booking(&payload).await?;

    println!("Booking confirmed: {}", created.id);
    Ok(())
}
