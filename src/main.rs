use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

use tidewire::config::Config;
use tidewire::newsroom::ContentGateway;
use tidewire::server::{build_router, AppState, AuthKeys};
use tidewire::storage::{Database, StorageError};

/// Get the config directory path (~/.config/tidewire/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("tidewire");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "tidewire", about = "Self-updating regional news backend")]
struct Args {
    /// Config directory (defaults to ~/.config/tidewire)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Database file (defaults to <config-dir>/news.db)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Listen address, overriding the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = match &args.config_dir {
        Some(dir) => dir.clone(),
        None => get_config_dir()?,
    };
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // SEC-007: Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let mut config = Config::load(&config_dir.join("config.toml"))?;
    config.apply_env_overrides();

    let bind = args.bind.unwrap_or_else(|| config.bind.clone());
    let db_path = args.db.unwrap_or_else(|| config_dir.join("news.db"));

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(StorageError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of tidewire appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    // A missing generation key is survivable: reads still work, the update
    // endpoint answers 503 until one is configured.
    let gateway = match &config.ai_api_key {
        Some(key) => {
            let gateway = ContentGateway::new(
                &config.ai_base_url,
                SecretString::from(key.clone()),
                &config.ai_model,
            )
            .context("Failed to configure content gateway")?;
            Some(Arc::new(gateway))
        }
        None => {
            tracing::warn!(
                "No generation API key configured; POST /update-content will answer 503"
            );
            None
        }
    };

    let auth = AuthKeys {
        cron_secret: config.cron_secret.clone().map(SecretString::from),
        internal_api_key: config.internal_api_key.clone().map(SecretString::from),
    };
    if auth.is_empty() {
        tracing::warn!(
            "No cron secret or internal API key configured; POST /update-content will reject every caller"
        );
    }

    let state = AppState {
        db,
        gateway,
        auth,
        retention_hours: config.article_retention_hours,
        article_page_limit: config.article_page_limit,
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!(addr = %bind, "tidewire listening");
    println!("tidewire listening on {}", bind);

    axum::serve(listener, router).await.context("Server error")?;

    Ok(())
}
