use std::{
    net::SocketAddr,
    path::PathBuf,
    process::ExitCode,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use moneysaver::{
    AppState, Error, LocalExpenseStore, SQLiteExpenseStore, build_router, graceful_shutdown,
    initialize_db, logging_middleware,
};

/// Where expenses and the monthly limit are kept.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// A SQLite database file, see `--db-path`.
    Sqlite,
    /// A JSON document in a directory, see `--data-dir`.
    Local,
}

/// The web server for MoneySaver.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The storage backend to use.
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// File path to the application SQLite database.
    #[arg(long, default_value = "moneysaver.db")]
    db_path: PathBuf,

    /// Directory for the JSON data file of the local backend.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Asia/Kolkata".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Log the headers and body of every request and response.
    #[arg(long)]
    log_requests: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let state = match create_app_state(&args) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut router = build_router(state);

    if args.log_requests {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    let result = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server stopped with an error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn create_app_state(args: &Args) -> Result<AppState, Error> {
    match args.backend {
        Backend::Sqlite => {
            tracing::info!("Using SQLite database at {}", args.db_path.display());
            let connection = Connection::open(&args.db_path)?;
            initialize_db(&connection)?;

            AppState::new(
                SQLiteExpenseStore::new(Arc::new(Mutex::new(connection))),
                &args.timezone,
            )
        }
        Backend::Local => {
            tracing::info!("Using local data directory {}", args.data_dir.display());

            AppState::new(LocalExpenseStore::open(&args.data_dir)?, &args.timezone)
        }
    }
}

/// Log to stdout, filtered by `RUST_LOG` or at the `info` level by default.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
