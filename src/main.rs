mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mindmate_analytics::{snapshot, ReportGenerator};
use mindmate_core::backend::{HttpBackend, MoodStore};
use mindmate_core::config::AppConfig;
use mindmate_core::types::ChatModel;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mindmate",
    about = "A supportive AI companion and mood tracker for your terminal",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/mindmate/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User id to chat and log moods as
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Override the assistant model (fast, balanced, accurate)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat,

    /// Print the wellness report and exit
    Dashboard,

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "mindmate=info,warn".into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Apply CLI overrides.
    if let Some(model) = &cli.model {
        config.session.default_model = model.parse::<ChatModel>()?;
    }
    if let Some(api_base) = &cli.api_base {
        config.backend.api_base = api_base.clone();
    }
    if let Some(user) = &cli.user {
        config.session.default_user = Some(user.clone());
    }

    match cli.command {
        Some(Commands::Dashboard) => {
            let user_id = require_user(&config)?;
            print_dashboard(&config, &user_id).await?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &config)?;
        }
        Some(Commands::Chat) | None => {
            let user_id = require_user(&config)?;
            repl::run(config, user_id).await?;
        }
    }

    Ok(())
}

/// Resolve the user id from CLI/config; the core takes it explicitly on
/// every call, so the driver must supply one.
fn require_user(config: &AppConfig) -> Result<String> {
    config.session.default_user.clone().ok_or_else(|| {
        anyhow::anyhow!("No user id. Pass --user <id> or set session.default_user in config.")
    })
}

async fn print_dashboard(config: &AppConfig, user_id: &str) -> Result<()> {
    let backend = HttpBackend::new(config)?;
    let entries = match backend.fetch_entries(user_id).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("failed to fetch mood entries: {}", e);
            Vec::new()
        }
    };
    let snap = snapshot(&entries);
    println!("{}", ReportGenerator::wellness_report(&snap));
    Ok(())
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
