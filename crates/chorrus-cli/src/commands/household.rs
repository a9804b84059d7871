use anyhow::{Context, Result};
use chorrus_client::ApiClient;

use crate::cli::{HouseholdCommands, OutputFormat};
use crate::output::{print_household, print_invite, print_success};

pub async fn run(
    client: &ApiClient,
    command: &HouseholdCommands,
    format: OutputFormat,
) -> Result<()> {
    let households = client.households();
    match command {
        HouseholdCommands::Create { name } => {
            let household = households.create(name).await?;
            print_success(&format!("Created household {}", household.name));
            print_household(&household, format)
        }
        HouseholdCommands::Show { id } => {
            let household = match id {
                Some(id) => households.get(*id).await?,
                // The backend has no "my household" endpoint; resolve it from
                // the caller's chores like the dashboard does.
                None => client
                    .dashboard()
                    .await?
                    .household
                    .context("Cannot determine your household yet. Pass its id")?,
            };
            print_household(&household, format)
        }
        HouseholdCommands::Rename { id, name } => {
            let household = households.update(*id, name).await?;
            print_success(&format!("Renamed household to {}", household.name));
            Ok(())
        }
        HouseholdCommands::Invite { id } => {
            let invite = households.generate_invite(*id).await?;
            print_invite(&invite, format)
        }
        HouseholdCommands::Join { code } => {
            let household = households.join(code).await?;
            print_success(&format!("Joined household {}", household.name));
            print_household(&household, format)
        }
    }
}
