use std::path::{Path, PathBuf};
use std::sync::Arc;

use address_book::infra::storage::migrations::Migrator;
use address_book::{AddressBook, AddressBookConfig};
use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;

mod db;
mod shutdown;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const API_INGRESS: &str = "api_ingress";
const ADDRESS_BOOK: &str = "address_book";

/// Address Book Server - owner-scoped contacts over REST
#[derive(Parser)]
#[command(name = "address-book-server")]
#[command(about = "Address Book Server - owner-scoped contacts over REST")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Address Book Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config, &args),
    }
}

fn database_config(config: &AppConfig) -> DatabaseConfig {
    config.database.clone().unwrap_or_else(|| {
        tracing::warn!("No database configuration found, using in-memory SQLite");
        DatabaseConfig {
            url: db::MEMORY_DSN.to_owned(),
            max_conns: None,
            busy_timeout_ms: None,
        }
    })
}

/// `modules.api_ingress`, falling back to `server.host:server.port` for the
/// bind address. `--port` always wins.
fn ingress_config(config: &AppConfig, args: &CliArgs) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(API_INGRESS)?;

    if !config.modules.contains_key(API_INGRESS) {
        cfg.bind_addr = format!("{}:{}", config.server.host, config.server.port);
        if config.server.timeout_sec > 0 {
            cfg.request_timeout_sec = config.server.timeout_sec;
        }
    } else if let Some(port) = args.port {
        let host = cfg
            .bind_addr
            .rsplit_once(':')
            .map_or(config.server.host.as_str(), |(host, _)| host);
        cfg.bind_addr = format!("{host}:{port}");
    }

    Ok(cfg)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let db_config = database_config(&config);
    let dsn = db::resolve_dsn(&db_config, args.mock, &base_dir)?;

    let conn = db::connect(&db_config, &dsn).await?;
    Migrator::up(&conn, None)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let book_config: AddressBookConfig = config.module_config(ADDRESS_BOOK)?;
    let book = AddressBook::new(conn.clone(), &book_config)?;

    let ingress = ApiIngress::new(ingress_config(&config, &args)?)
        .with_health_check(Arc::new(db::DbHealthCheck::new(conn.clone())));
    let router = ingress.build_router(book.router());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = shutdown::wait_for_shutdown().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
        on_signal.cancel();
    });

    ingress.serve(router, cancel).await?;

    conn.close().await.context("Failed to close database")?;
    tracing::info!("Address Book Server stopped");
    Ok(())
}

fn check_config(config: &AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let db_config = database_config(config);
    if !args.mock {
        db::detect_backend(&db_config.url)?;
    }
    let _: AddressBookConfig = config.module_config(ADDRESS_BOOK)?;
    let ingress = ingress_config(config, args)?;
    ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", ingress.bind_addr))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
