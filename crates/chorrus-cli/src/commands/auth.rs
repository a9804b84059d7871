use anyhow::{Context, Result};
use chorrus_auth::FirebaseTokenProvider;
use chorrus_client::ClientConfig;
use colored::Colorize;

use crate::auth;
use crate::cli::LoginArgs;
use crate::output::{print_error, print_success};

pub async fn login(config: &ClientConfig, args: &LoginArgs, profile: &str) -> Result<()> {
    let fb = auth::firebase_config(config, profile)?.context(
        "No Firebase API key configured. Run: chorrus config set firebase-api-key <key>",
    )?;
    let provider = FirebaseTokenProvider::new(fb)?;
    let identity = provider
        .sign_in_with_password(&args.email, &args.password)
        .await?;
    print_success(&format!(
        "Signed in as {} (profile: {})",
        identity.label().cyan(),
        profile
    ));
    Ok(())
}

pub async fn logout(config: &ClientConfig, profile: &str, token: Option<&str>) -> Result<()> {
    let session = auth::start_session(auth::select_provider(config, profile, token)?).await?;
    let Some(identity) = session.identity() else {
        println!("Not signed in (profile: \"{profile}\")");
        return Ok(());
    };
    session.logout().await.context("Sign-out failed; you are still signed in")?;
    print_success(&format!("Signed out {}", identity.label().cyan()));
    Ok(())
}

pub async fn whoami(config: &ClientConfig, profile: &str, token: Option<&str>) -> Result<()> {
    let session = auth::start_session(auth::select_provider(config, profile, token)?).await?;
    match session.identity() {
        Some(identity) => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!("{}: {}", "Server".cyan(), config.api_url.cyan());
            println!("{}: {}", "Provider".cyan(), session.provider().name());
            println!("{}: {}", "User".cyan(), identity.uid);
            if let Some(email) = &identity.email {
                println!("{}: {}", "Email".cyan(), email);
            }
            if let Some(name) = &identity.display_name {
                println!("{}: {}", "Name".cyan(), name);
            }
        }
        None => {
            print_error(&format!("Not signed in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}
