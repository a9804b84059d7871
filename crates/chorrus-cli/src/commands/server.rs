use anyhow::Result;
use chorrus_auth::MemoryTokenProvider;
use chorrus_client::{ApiClient, ClientConfig};
use colored::Colorize;
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::output::print_dashboard;

pub async fn status(config: &ClientConfig) -> Result<()> {
    // Health needs no identity.
    let session = crate::auth::start_session(Arc::new(MemoryTokenProvider::anonymous())).await?;
    let client = ApiClient::new(config, session)?;
    let server = config.root_url();
    let (code, body) = client.health().await?;
    if code == 200 {
        println!("{} {} is {}", "✓".green(), server.cyan(), "healthy".green());
        if !body.is_empty() {
            println!("  {body}");
        }
    } else {
        println!(
            "{} {} returned {} {}",
            "✗".red(),
            server.cyan(),
            code.to_string().red(),
            body
        );
    }
    Ok(())
}

pub async fn dashboard(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let dashboard = client.dashboard().await?;
    print_dashboard(&dashboard, format)
}
