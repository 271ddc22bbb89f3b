use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rollbook::auth::TokenGenerator;
use rollbook::config::ServerConfig;
use rollbook::server::{AppState, create_router};
use rollbook::store::{SqliteStore, Store};
use rollbook::types::{Account, Role};

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| {
        let valid: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        format!("unknown role '{s}' (expected one of: {})", valid.join(", "))
    })
}

#[derive(Parser)]
#[command(name = "rollbook")]
#[command(about = "Course-scoped access control server for school records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// TOML config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and admin token)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Create an account and print a token for it
    CreateAccount {
        /// Account role (admin, supervisor, teacher, guardian, student)
        #[arg(long, value_parser = parse_role)]
        role: Role,

        /// Display name
        #[arg(long)]
        name: String,

        /// Token lifetime in days; never expires if omitted
        #[arg(long)]
        expires_in_days: Option<u32>,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

fn open_initialized_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let not_initialized = || {
        format!(
            "Server not initialized. Run 'rollbook admin init --data-dir {}' first to create the database and admin token.",
            config.data_dir.display()
        )
    };

    if !config.db_path().exists() {
        bail!(not_initialized());
    }

    let store = SqliteStore::new(config.db_path())?;
    if !store.has_admin_token()? {
        bail!(not_initialized());
    }
    Ok(store)
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..Default::default()
    };
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let token_file = config.admin_token_path();

    if store.has_admin_token()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let (raw_token, token) = TokenGenerator::new().issue(None, true, None)?;

    store.create_token(&token)?;
    fs::write(&token_file, &raw_token)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    println!();
    println!("========================================");
    println!("Admin token (save this, it won't be shown again):");
    println!();
    println!("  {raw_token}");
    println!();
    println!("Token also written to: {}", token_file.display());
    println!("========================================");
    println!();

    Ok(())
}

fn run_create_account(
    data_dir: PathBuf,
    role: Role,
    name: String,
    expires_in_days: Option<u32>,
) -> anyhow::Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("Display name cannot be empty");
    }

    let config = ServerConfig {
        data_dir,
        ..Default::default()
    };
    let store = open_initialized_store(&config)?;

    let now = Utc::now();
    let account = Account {
        id: Uuid::new_v4().to_string(),
        display_name: name,
        role,
        active: true,
        created_at: now,
        updated_at: now,
    };
    store.create_account(&account)?;

    let expires_at = expires_in_days.map(|d| now + Duration::days(i64::from(d)));
    let (raw_token, token) =
        TokenGenerator::new().issue(Some(account.id.clone()), false, expires_at)?;
    store.create_token(&token)?;

    println!("Created {} account '{}'", account.role, account.display_name);
    println!("  id:    {}", account.id);
    println!("  token: {raw_token}");

    Ok(())
}

async fn run_serve(
    config_file: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match &config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }

    let store = open_initialized_store(&config)?;

    info!(
        "Admin token available at {}",
        config.admin_token_path().display()
    );

    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rollbook=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => run_init(data_dir)?,
            AdminCommands::CreateAccount {
                role,
                name,
                expires_in_days,
                data_dir,
            } => run_create_account(data_dir, role, name, expires_in_days)?,
        },
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
        } => run_serve(config, host, port, data_dir).await?,
    }

    Ok(())
}
