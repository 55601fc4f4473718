use anyhow::Result;
use clap::{Parser, Subcommand};

use moodify::app::{App, HistoryView, Route};
use moodify::discovery::EMOTIONS;
use moodify::forms::{FieldErrors, REGISTER_REDIRECT_DELAY};
use moodify::models::Track;

#[derive(Parser)]
#[command(name = "moodify", about = "Mood-driven music discovery", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Top tracks for an emotion (Sad, Happy, Angry, Chill, or your own)
    Discover { emotion: String },
    /// Free-text track search
    Search { query: String },
    /// Your most recently surfaced tracks
    History,
    /// Drop the stored session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app = App::from_env()?;

    match cli.command {
        Command::Login { email, password } => match app.login(&email, &password).await {
            Ok((session, route)) => {
                println!("Signed in as {}.", session.display_label());
                print_route_hint(route);
            }
            Err(errors) => print_field_errors(&errors),
        },
        Command::Register {
            username,
            email,
            password,
        } => match app.register(&username, &email, &password).await {
            Ok((message, route)) => {
                println!("{}", message);
                tokio::time::sleep(REGISTER_REDIRECT_DELAY).await;
                print_route_hint(route);
            }
            Err(errors) => print_field_errors(&errors),
        },
        Command::Discover { emotion } => match app.discover(&emotion).await {
            Ok(tracks) => print_tracks(&tracks),
            Err(_) => print_alert(&app),
        },
        Command::Search { query } => match app.search(&query).await {
            Ok(tracks) => print_tracks(&tracks),
            Err(_) => print_alert(&app),
        },
        Command::History => match app.history().await {
            Ok(HistoryView::SignedOut) => {
                println!("Please sign in first with `moodify login`.");
            }
            Ok(HistoryView::Loaded { session, plays }) => {
                println!("Recently played for {}:", session.display_label());
                if plays.is_empty() {
                    println!("Nothing here yet. Try `moodify discover {}`.", EMOTIONS[1]);
                }
                for play in plays {
                    println!(
                        "[{}] {} - {}\n    {}",
                        play.emotion, play.artist_name, play.track_name, play.url
                    );
                }
            }
            Err(e) => {
                log::error!("{}", e);
                eprintln!("Could not load your recently played tracks.");
            }
        },
        Command::Logout => {
            app.logout()?;
            println!("Signed out.");
        }
    }

    Ok(())
}

fn print_route_hint(route: Route) {
    match route {
        Route::Login => println!("You can now sign in with `moodify login`."),
        Route::Main => println!("Try `moodify discover Happy` or `moodify search <query>` next."),
        Route::Register => println!("Create an account with `moodify register`."),
        Route::History => println!("See your history with `moodify history`."),
    }
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("No results.");
        return;
    }
    for track in tracks {
        println!("{} - {}\n    {}", track.artist, track.name, track.url);
    }
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in [
        ("username", &errors.username),
        ("email", &errors.email),
        ("password", &errors.password),
    ] {
        if let Some(message) = message {
            eprintln!("{}: {}", field, message);
        }
    }
    if let Some(message) = &errors.form {
        eprintln!("{}", message);
    }
}

fn print_alert(app: &App) {
    if let Some(alert) = app.view_state().lock().alert.clone() {
        eprintln!("{}", alert);
    }
}
