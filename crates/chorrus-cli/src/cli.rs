use chorrus_core::{ChoreFilter, DueDate, RecurrenceInterval};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "chorrus")]
#[command(about = "Chorrus CLI: track household chores from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and chorrus.toml)
    #[arg(short, long, global = true, env = "CHORRUS_API_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "CHORRUS_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Use a pre-issued ID token instead of the stored session
    #[arg(long, global = true, env = "CHORRUS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to chorrus.toml
    #[arg(long, global = true, env = "CHORRUS_CONFIG")]
    pub config: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Check backend health
    Status,
    /// Your open chores and your household
    Dashboard,
    /// Manage chores
    Chores(ChoresArgs),
    /// Manage your household
    Household(HouseholdArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Account password
    #[arg(long, env = "CHORRUS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct ChoresArgs {
    #[command(subcommand)]
    pub command: ChoreCommands,
}

#[derive(Subcommand)]
pub enum ChoreCommands {
    /// List household chores
    List {
        /// Which chores to show (all, pending, completed)
        #[arg(long, default_value_t = ChoreFilter::Pending)]
        filter: ChoreFilter,
    },
    /// List chores assigned to you
    Mine {
        /// Include completed chores
        #[arg(long)]
        all: bool,
    },
    /// Show one chore
    Show { id: Uuid },
    /// Create a chore
    Create(CreateChoreArgs),
    /// Update a chore
    Update(UpdateChoreArgs),
    /// Delete a chore
    Delete { id: Uuid },
    /// Mark your assignment of a chore as done
    Complete { id: Uuid },
}

#[derive(clap::Args)]
pub struct CreateChoreArgs {
    /// Chore title (1-100 characters)
    #[arg(short, long)]
    pub title: String,
    /// Due date (YYYY-MM-DD)
    #[arg(short, long)]
    pub due: DueDate,
    #[arg(short = 'D', long)]
    pub description: Option<String>,
    /// Repeat every day, week or two weeks (daily, weekly, bi-weekly)
    #[arg(short, long)]
    pub recurring: Option<RecurrenceInterval>,
    /// Household member to assign (repeatable)
    #[arg(short, long = "assign")]
    pub assignees: Vec<Uuid>,
}

#[derive(clap::Args)]
pub struct UpdateChoreArgs {
    pub id: Uuid,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short = 'D', long)]
    pub description: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(short, long)]
    pub due: Option<DueDate>,
    /// Make the chore recurring at this interval
    #[arg(short, long, conflicts_with = "once")]
    pub recurring: Option<RecurrenceInterval>,
    /// Stop the chore from recurring
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args)]
pub struct HouseholdArgs {
    #[command(subcommand)]
    pub command: HouseholdCommands,
}

#[derive(Subcommand)]
pub enum HouseholdCommands {
    /// Create a household with you as admin
    Create { name: String },
    /// Show a household and its members (defaults to yours)
    Show { id: Option<Uuid> },
    /// Rename a household
    Rename { id: Uuid, name: String },
    /// Generate a new invite code
    Invite { id: Uuid },
    /// Join a household with an invite code
    Join { code: String },
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format, firebase-api-key)
    pub key: String,
    /// Value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chore_create() {
        let cli = Cli::try_parse_from([
            "chorrus", "chores", "create", "--title", "Dishes", "--due", "2024-01-01",
            "--recurring", "bi-weekly",
        ])
        .unwrap();
        let Commands::Chores(ChoresArgs {
            command: ChoreCommands::Create(args),
        }) = cli.command
        else {
            panic!("expected chores create");
        };
        assert_eq!(args.title, "Dishes");
        assert_eq!(args.due.to_string(), "2024-01-01");
        assert_eq!(args.recurring, Some(RecurrenceInterval::BiWeekly));
        assert!(args.assignees.is_empty());
    }

    #[test]
    fn test_list_filter_defaults_to_pending() {
        let cli = Cli::try_parse_from(["chorrus", "chores", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chores(ChoresArgs {
                command: ChoreCommands::List {
                    filter: ChoreFilter::Pending
                }
            })
        ));
        assert_eq!(cli.profile, "default");
    }

    #[test]
    fn test_rejects_bad_due_date() {
        assert!(
            Cli::try_parse_from(["chorrus", "chores", "create", "-t", "x", "--due", "tomorrow"])
                .is_err()
        );
    }

    #[test]
    fn test_update_recurring_conflicts_with_once() {
        let id = "9c2d7e1a-5b3f-4a8e-b6d4-7f0e1c2a3b45";
        assert!(
            Cli::try_parse_from([
                "chorrus", "chores", "update", id, "--recurring", "daily", "--once"
            ])
            .is_err()
        );
    }
}
