//! Command line parsing

use anyhow::{anyhow, bail, Context};

use rb_core::RoomCode;

/// Stay details collected from `book` flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookArgs {
    pub check_in: String,
    pub check_out: String,
    pub room: RoomCode,
    pub people: u32,
    pub name: String,
    pub phone: String,
    pub pickup: bool,
}

/// Run mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// List room types
    Rooms,
    /// Log in with LINE and book a room
    Book(BookArgs),
    /// Show the LINE profile
    Whoami,
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Parse command line arguments (without the program name)
pub fn parse_args<I>(args: I) -> anyhow::Result<RunMode>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let Some(command) = args.next() else {
        return Ok(RunMode::Help);
    };

    match command.as_str() {
        "rooms" => Ok(RunMode::Rooms),
        "whoami" => Ok(RunMode::Whoami),
        "book" => parse_book(args).map(RunMode::Book),
        "--help" | "-h" | "help" => Ok(RunMode::Help),
        "--version" | "-v" => Ok(RunMode::Version),
        other => bail!("Unknown command: {} (see --help)", other),
    }
}

fn parse_book<I>(mut args: I) -> anyhow::Result<BookArgs>
where
    I: Iterator<Item = String>,
{
    let mut check_in = None;
    let mut check_out = None;
    let mut room = None;
    let mut people = None;
    let mut name = None;
    let mut phone = None;
    let mut pickup = false;

    while let Some(flag) = args.next() {
        if flag == "--pickup" {
            pickup = true;
            continue;
        }

        let value = args
            .next()
            .ok_or_else(|| anyhow!("Missing value for {}", flag))?;

        match flag.as_str() {
            "--check-in" => check_in = Some(value),
            "--check-out" => check_out = Some(value),
            "--room" => room = Some(value.parse::<RoomCode>()?),
            "--people" => {
                people = Some(
                    value
                        .parse::<u32>()
                        .with_context(|| format!("Invalid --people: {}", value))?,
                )
            }
            "--name" => name = Some(value),
            "--phone" => phone = Some(value),
            other => bail!("Unknown option for book: {}", other),
        }
    }

    Ok(BookArgs {
        check_in: check_in.context("--check-in is required")?,
        check_out: check_out.context("--check-out is required")?,
        room: room.context("--room is required")?,
        people: people.context("--people is required")?,
        name: name.context("--name is required")?,
        phone: phone.context("--phone is required")?,
        pickup,
    })
}

/// Print help message
pub fn print_help() {
    println!("room-booking - Room booking client with LINE login");
    println!();
    println!("Usage:");
    println!("  room-booking rooms                List bookable room types");
    println!("  room-booking whoami               Show your LINE profile");
    println!("  room-booking book [options]       Book a room");
    println!("  room-booking --help               Show this help message");
    println!("  room-booking --version            Show version");
    println!();
    println!("Book options:");
    println!("  --check-in DATE    Check-in date (e.g. 2025-03-01)");
    println!("  --check-out DATE   Check-out date");
    println!("  --room CODE        single, double or family");
    println!("  --people N         Number of guests");
    println!("  --name NAME        Guest name");
    println!("  --phone PHONE      Contact phone number");
    println!("  --pickup           Request a pickup");
    println!();
    println!("Environment Variables:");
    println!("  API_BASE           Booking backend (default: http://localhost:10000)");
    println!("  LIFF_ID            LIFF app ID (required for whoami/book)");
    println!("  LINE_ACCESS_TOKEN  Access token from LINE Login");
    println!("  LINE_REDIRECT_URI  Where LINE Login returns to");
    println!("  LINE_USER_AGENT    User agent of the hosting browser");
}
