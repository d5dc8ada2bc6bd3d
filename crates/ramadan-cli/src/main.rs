use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ramadan", version, about = "Prayer times and Iftar/Suhoor countdowns")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the day's prayer times
    Times(commands::times::TimesArgs),
    /// Count down to Iftar and the end of Suhoor
    Countdown(commands::countdown::CountdownArgs),
    /// Advance the saved engine once and print its snapshot as JSON
    Status,
    /// Show today's Hijri date
    Hijri(commands::hijri::HijriArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Favorite cities
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("RAMADAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Times(args) => commands::times::run(args),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Status => commands::status::run(),
        Commands::Hijri(args) => commands::hijri::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Favorites { action } => commands::favorites::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
