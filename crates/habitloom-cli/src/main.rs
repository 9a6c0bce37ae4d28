use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitloom", version, about = "Habitloom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Completion log management
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// User profile management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
