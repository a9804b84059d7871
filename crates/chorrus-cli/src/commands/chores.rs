use anyhow::Result;
use chorrus_client::ApiClient;
use chorrus_core::{ChoreUpdate, NewChore};

use crate::cli::{ChoreCommands, CreateChoreArgs, OutputFormat, UpdateChoreArgs};
use crate::output::{print_assignment, print_chore, print_chores, print_success};

pub async fn run(client: &ApiClient, command: &ChoreCommands, format: OutputFormat) -> Result<()> {
    let chores = client.chores();
    match command {
        ChoreCommands::List { filter } => {
            let list = chores.list_filtered(*filter).await?;
            print_chores(&list, format)
        }
        ChoreCommands::Mine { all } => {
            let list = chores.list_mine(*all).await?;
            print_chores(&list, format)
        }
        ChoreCommands::Show { id } => print_chore(&chores.get(*id).await?, format),
        ChoreCommands::Create(args) => {
            let chore = chores.create(&new_chore(args)).await?;
            print_chore(&chore, format)
        }
        ChoreCommands::Update(args) => {
            let update = chore_update(args);
            if update.is_empty() {
                anyhow::bail!(
                    "Nothing to update. Pass --title, --description, --due, --recurring or --once"
                );
            }
            let chore = chores.update(args.id, &update).await?;
            print_chore(&chore, format)
        }
        ChoreCommands::Delete { id } => {
            chores.delete(*id).await?;
            print_success(&format!("Deleted chore {id}"));
            Ok(())
        }
        ChoreCommands::Complete { id } => {
            let assignment = chores.mark_complete(*id).await?;
            print_assignment(&assignment, format)
        }
    }
}

fn new_chore(args: &CreateChoreArgs) -> NewChore {
    let mut chore = NewChore::new(args.title.clone(), args.due);
    if let Some(description) = &args.description {
        chore = chore.with_description(description.clone());
    }
    if let Some(interval) = args.recurring {
        chore = chore.recurring(interval);
    }
    if !args.assignees.is_empty() {
        chore = chore.assigned_to(args.assignees.iter().copied());
    }
    chore
}

fn chore_update(args: &UpdateChoreArgs) -> ChoreUpdate {
    let mut update = ChoreUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        due_date: args.due,
        ..Default::default()
    };
    if let Some(interval) = args.recurring {
        update.is_recurring = Some(true);
        update.recurrence_interval = Some(interval);
    } else if args.once {
        update.is_recurring = Some(false);
    }
    update
}
