use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_booking::{
    config::{Config, LogFormat},
    models::{datetime, EventDraft, ImageUpload},
    views::{
        AuthView, BookingsView, CancelOutcome, Confirm, CreateEventView, DashboardOutcome,
        EditEventView, EventCatalogView, EventDetailView, OrganizerDashboard,
    },
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "event-booking", version, about = "Browse events, book seats and manage your own events")]
struct Cli {
    /// API base URL (overrides API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Where the session token is stored (overrides SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all events
    Events,
    /// Show one event
    Event { id: i64 },
    /// Book seats for an event
    Book { id: i64, seats: i32 },
    /// List your bookings
    Bookings,
    /// Cancel one of your bookings
    Cancel { booking_id: i64 },
    /// List the events you organize
    Dashboard,
    /// Create a new event
    CreateEvent(EventArgs),
    /// Edit an existing event; omitted fields keep their current value
    EditEvent {
        id: i64,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete one of your events
    DeleteEvent { id: i64 },
    /// Log in and store the session token
    Login { email: String, password: String },
    /// Create an account
    Register { name: String, email: String, password: String },
    /// Forget the stored session token
    Logout,
}

#[derive(Args)]
struct EventArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    location: String,
    /// YYYY-MM-DD or YYYY-MM-DDTHH:MM
    #[arg(long)]
    date: String,
    #[arg(long)]
    seats: i32,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    seats: Option<i32>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    image: Option<PathBuf>,
}

/// y/N в терминале; --yes отвечает за пользователя.
struct TerminalPrompt {
    assume_yes: bool,
}

impl Confirm for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.api_url.clone(), cli.session_file.clone());

    // stdout занят выводом view, логи - в stderr
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }

    let state = AppState::new(config).context("Failed to initialize session")?;
    let prompt = TerminalPrompt { assume_yes: cli.yes };
    let client = state.client.clone();

    let ok = match cli.command {
        Commands::Events => {
            let mut view = EventCatalogView::new(client);
            view.load().await;
            print!("{}", view);
            view.state().error().is_none()
        }
        Commands::Event { id } => {
            let mut view = EventDetailView::new(client, id);
            view.load().await;
            print!("{}", view);
            view.state().error().is_none()
        }
        Commands::Book { id, seats } => {
            let mut view = EventDetailView::new(client, id);
            view.load().await;
            let booked = view.state().data().is_some() && view.book(seats).await.is_ok();
            print!("{}", view);
            booked
        }
        Commands::Bookings => {
            let mut view = BookingsView::new(client);
            view.load().await;
            print!("{}", view);
            view.state().error().is_none()
        }
        Commands::Cancel { booking_id } => {
            let mut view = BookingsView::new(client);
            view.load().await;
            let outcome = view.cancel(booking_id, &prompt).await;
            if outcome == CancelOutcome::NotCancellable {
                println!("Booking {} cannot be canceled.", booking_id);
            }
            print!("{}", view);
            !matches!(outcome, CancelOutcome::Failed(_) | CancelOutcome::NotCancellable)
        }
        Commands::Dashboard => {
            let mut view = OrganizerDashboard::new(client);
            view.load().await;
            print!("{}", view);
            view.state().error().is_none()
        }
        Commands::CreateEvent(args) => {
            let draft = EventDraft {
                title: args.title,
                description: args.description,
                location: args.location,
                date: parse_date(&args.date)?,
                total_seats: args.seats,
                price: args.price,
                image: load_image(args.image.as_deref())?,
                current_image_url: None,
            };
            let mut view = CreateEventView::new(client, draft);
            let created = view.submit().await.is_ok();
            print!("{}", view);
            created
        }
        Commands::EditEvent { id, fields } => {
            let mut view = EditEventView::new(client, id);
            view.load().await;
            let mut ok = view.state().data().is_some();
            if let Some(draft) = view.draft_mut() {
                apply_edits(draft, fields)?;
                ok = view.submit().await.is_ok();
            }
            print!("{}", view);
            ok
        }
        Commands::DeleteEvent { id } => {
            let mut view = OrganizerDashboard::new(client);
            view.load().await;
            let outcome = view.delete_event(id, &prompt).await;
            print!("{}", view);
            !matches!(outcome, DashboardOutcome::Failed(_))
        }
        Commands::Login { email, password } => {
            let mut view = AuthView::new(client);
            let ok = view.login(&email, &password).await.is_ok();
            print!("{}", view);
            ok
        }
        Commands::Register { name, email, password } => {
            let mut view = AuthView::new(client);
            let ok = view.register(&name, &email, &password).await.is_ok();
            print!("{}", view);
            ok
        }
        Commands::Logout => {
            let mut view = AuthView::new(client);
            view.logout()?;
            print!("{}", view);
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn parse_date(raw: &str) -> Result<chrono::NaiveDateTime> {
    datetime::parse(raw).with_context(|| format!("Invalid date '{}'", raw))
}

fn load_image(path: Option<&std::path::Path>) -> Result<Option<ImageUpload>> {
    path.map(|p| ImageUpload::from_path(p).with_context(|| format!("Failed to read image {}", p.display())))
        .transpose()
}

fn apply_edits(draft: &mut EventDraft, fields: EditArgs) -> Result<()> {
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(location) = fields.location {
        draft.location = location;
    }
    if let Some(date) = fields.date {
        draft.date = parse_date(&date)?;
    }
    if let Some(seats) = fields.seats {
        draft.total_seats = seats;
    }
    if let Some(price) = fields.price {
        draft.price = price;
    }
    if let Some(image) = load_image(fields.image.as_deref())? {
        draft.image = Some(image);
    }
    Ok(())
}
