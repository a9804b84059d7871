mod auth;
mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use chorrus_client::ClientConfig;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    // Optional .env for local development.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = cli.profile.as_str();
    let token = cli.token.as_deref();
    let profile_cfg = config::load_profile(profile)?;
    let format = cli
        .format
        .or_else(|| profile_cfg.output_format())
        .unwrap_or_default();

    let client_cfg =
        config::resolve_client_config(cli.server.as_deref(), cli.config.as_deref(), &profile_cfg)?;
    let level = if cli.verbose {
        "debug"
    } else {
        client_cfg.logging.level.as_str()
    };
    observability::init_tracing_with_level(level);
    tracing::debug!(profile, api = %client_cfg.api_base_url(), "configuration resolved");

    match &cli.command {
        Commands::Login(args) => {
            commands::auth::login(&client_cfg, args, profile).await?;
        }
        Commands::Logout => {
            commands::auth::logout(&client_cfg, profile, token).await?;
        }
        Commands::Whoami => {
            commands::auth::whoami(&client_cfg, profile, token).await?;
        }
        Commands::Status => {
            commands::server::status(&client_cfg).await?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => show_config(profile, &profile_cfg, &client_cfg),
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = profile_cfg.clone();
                cfg.set(&set_args.key, &set_args.value)?;
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Dashboard => {
            let client = auth::authenticated_client(&client_cfg, profile, token).await?;
            commands::server::dashboard(&client, format).await?;
        }
        Commands::Chores(args) => {
            let client = auth::authenticated_client(&client_cfg, profile, token).await?;
            commands::chores::run(&client, &args.command, format).await?;
        }
        Commands::Household(args) => {
            let client = auth::authenticated_client(&client_cfg, profile, token).await?;
            commands::household::run(&client, &args.command, format).await?;
        }
    }

    Ok(())
}

fn show_config(profile: &str, profile_cfg: &config::ProfileConfig, client_cfg: &ClientConfig) {
    println!("{}: {}", "Profile".cyan(), profile);
    println!("{}: {}", "Server".cyan(), client_cfg.api_url);
    println!("{}: {}", "API base".cyan(), client_cfg.api_base_url());
    println!(
        "{}: {}",
        "Format".cyan(),
        profile_cfg.format.as_deref().unwrap_or("table")
    );
    println!(
        "{}: {}",
        "Firebase".cyan(),
        if client_cfg.firebase.api_key.is_some() {
            "configured"
        } else {
            "(not set)"
        }
    );
}
