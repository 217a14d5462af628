use clap::Parser;
use color_eyre::Result;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use dreamlog::cli::{self, AddArgs, Cli, Commands};
use dreamlog::models::Coordinates;
use dreamlog::{Config, Database, Profile};

fn init_tracing(default_filter: &str) {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev selects a separate config and database
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(&dreamlog::utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };
    init_tracing(&config.log_level);

    let db = Rc::new(Database::new(config.get_database_path()));
    db.ensure_schema()?;

    match cli.command.unwrap_or(Commands::Day { date: None }) {
        Commands::Add { name, description, mood, location, notes, tags, date, lat, lon } => {
            let coordinates = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
            let args = AddArgs { name, description, mood, location, notes, tags, date, coordinates };
            cli::handle_add(args, &db)?;
        }
        Commands::Day { date } => {
            cli::handle_day(date, &db)?;
        }
        Commands::Week { date, offset } => {
            cli::handle_week(date, offset, config.week_start, &db)?;
        }
        Commands::Month { year, month } => {
            cli::handle_month(year, month, config.week_start, &db)?;
        }
        Commands::Moods => cli::handle_moods(),
    }

    Ok(())
}
