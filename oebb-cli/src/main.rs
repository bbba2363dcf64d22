use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use oebb_cli::cache::DiskCache;
use oebb_cli::display::{render_connection, render_no_connections, render_stations};
use oebb_cli::domain::AuthSession;
use oebb_cli::journeys::JourneyQuery;
use oebb_cli::oebb::{OebbClient, OebbConfig, OebbError};
use oebb_cli::session::{SessionManager, SessionPolicy};
use oebb_cli::stations::StationResolver;

mod cli;
mod progress;

use cli::{Cli, Command, SearchArgs, StationsArgs};
use progress::Spinner;

/// Exit code after Ctrl-C, as shells report for SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    // Dropping the in-flight future aborts any hung request.
    tokio::select! {
        result = run(&cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("cancelled");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(cli: &Cli) -> Result<(), OebbError> {
    let mut config = OebbConfig::new().with_timeout(cli.timeout);
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url);
    }
    let client = OebbClient::new(config)?;

    let cache = match &cli.cache_dir {
        Some(dir) => DiskCache::new(dir),
        None => DiskCache::user_default().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to temporary cache directory");
            DiskCache::new(std::env::temp_dir().join("oebb-cli"))
        }),
    };

    let manager = SessionManager::new(&cache, &client, SessionPolicy::default());
    let session = if cli.refresh {
        manager.refresh().await?
    } else {
        manager.get_or_refresh().await?
    };

    let result = match &cli.command {
        Command::Search(args) => search(&client, &session, args).await,
        Command::Stations(args) => stations(&client, &session, args).await,
    };

    if matches!(result, Err(OebbError::Unauthorized)) {
        manager.invalidate();
    }
    result
}

async fn search(client: &OebbClient, session: &AuthSession, args: &SearchArgs) -> Result<(), OebbError> {
    let spinner = Spinner::stderr("Searching for connections ");

    let resolver = StationResolver::new(client);
    let from = resolver.best_match(&args.from, session).await?;
    let to = resolver.best_match(&args.to, session).await?;

    let departure = args.departure(Local::now().naive_local());
    let connections = JourneyQuery::new(client)
        .search(from.clone(), to.clone(), departure, args.results, session)
        .await?;

    drop(spinner);

    if connections.is_empty() {
        print!("{}", render_no_connections(&from, &to));
        return Ok(());
    }

    for conn in &connections {
        println!("{}", render_connection(conn));
    }
    Ok(())
}

async fn stations(client: &OebbClient, session: &AuthSession, args: &StationsArgs) -> Result<(), OebbError> {
    let stations = StationResolver::new(client).resolve(&args.name, session).await?;
    print!("{}", render_stations(&stations));
    Ok(())
}
