//! # Bookshelf Server
//!
//! `bookshelf-server` serves the HTTP API. `bookshelf-server init` creates
//! the `books` table and exits.

use bookshelf_config::ConfigLoader;
use bookshelf_core::{BookshelfError, BookshelfResult};
use bookshelf_rest::create_router;
use bookshelf_server::container::AppContainer;
use bookshelf_server::lifecycle::{shutdown_signal, Lifecycle};
use bookshelf_server::logging::init_logging;
use bookshelf_server::startup::{print_startup_info, Command};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!("Starting Bookshelf Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let result = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => match AppContainer::build(config) {
            Ok(container) => run(command, container).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, container: AppContainer) -> BookshelfResult<()> {
    let result = match command {
        Command::Init => init_schema(&container).await,
        Command::Serve => serve(&container).await,
    };

    container.close().await;
    result
}

async fn init_schema(container: &AppContainer) -> BookshelfResult<()> {
    container.db_pool().run_migrations().await?;
    info!("Database initialized successfully");
    Ok(())
}

async fn serve(container: &AppContainer) -> BookshelfResult<()> {
    let server_config = &container.config().server;
    let lifecycle = Lifecycle::new(server_config.shutdown_grace());

    let state = container
        .app_state()
        .with_abandon_token(lifecycle.abandon_token());
    let router = create_router(state);

    let addr = server_config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BookshelfError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Starting REST server on http://{}", addr);
    print_startup_info(&addr);

    lifecycle.serve(listener, router, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
