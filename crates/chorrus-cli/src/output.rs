use anyhow::Result;
use chorrus_client::Dashboard;
use chorrus_core::{Chore, ChoreAssignment, Household, Invite, today_utc};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Short form of an id for tables.
fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn chore_status(chore: &Chore) -> String {
    if chore.assignments.is_empty() {
        return "unassigned".to_string();
    }
    let done = chore.assignments.iter().filter(|a| a.is_completed()).count();
    let total = chore.assignments.len();
    if done == total {
        "done".to_string()
    } else if chore.due_date.is_before(today_utc()) {
        format!("overdue ({done}/{total})")
    } else {
        format!("pending ({done}/{total})")
    }
}

fn assignees(chore: &Chore) -> String {
    let names: Vec<String> = chore
        .assignments
        .iter()
        .map(|a| match &a.user {
            Some(user) => user.label().to_string(),
            None => short_id(&a.user_id),
        })
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn chore_table(chores: &[Chore]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "Due", "Repeats", "Assigned", "Status"]);
    for chore in chores {
        builder.push_record([
            short_id(&chore.id),
            chore.title.clone(),
            chore.due_date.to_string(),
            chore
                .recurrence_interval
                .filter(|_| chore.is_recurring)
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
            assignees(chore),
            chore_status(chore),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_chores(chores: &[Chore], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(chores),
        OutputFormat::Table => {
            if chores.is_empty() {
                println!("No chores found.");
            } else {
                println!("{}", chore_table(chores));
                println!("Total: {}", chores.len());
            }
            Ok(())
        }
    }
}

pub fn print_chore(chore: &Chore, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(chore);
    }
    println!("{}: {}", "Chore".cyan(), chore.title.bold());
    println!("{}: {}", "ID".cyan(), chore.id);
    if let Some(description) = &chore.description {
        println!("{}: {}", "Description".cyan(), description);
    }
    println!("{}: {}", "Due".cyan(), chore.due_date);
    if let Some(interval) = chore.recurrence_interval.filter(|_| chore.is_recurring) {
        println!("{}: {}", "Repeats".cyan(), interval);
    }
    println!("{}: {}", "Status".cyan(), chore_status(chore));
    for assignment in &chore.assignments {
        print_assignment_line(assignment);
    }
    Ok(())
}

fn print_assignment_line(assignment: &ChoreAssignment) {
    let who = assignment
        .user
        .as_ref()
        .map_or_else(|| assignment.user_id.to_string(), |u| u.label().to_string());
    let mark = if assignment.is_completed() {
        "✓".green()
    } else {
        "○".yellow()
    };
    match &assignment.completed_at {
        Some(at) => println!("  {mark} {who} (completed {at})"),
        None => println!("  {mark} {who}"),
    }
}

pub fn print_assignment(assignment: &ChoreAssignment, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(assignment);
    }
    print_success(&format!("Chore {} marked {}", assignment.chore_id, assignment.status));
    Ok(())
}

pub fn print_household(household: &Household, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(household);
    }
    println!("{}: {}", "Household".cyan(), household.name.bold());
    println!("{}: {}", "ID".cyan(), household.id);
    println!("{}: {}", "Invite code".cyan(), household.invite_code);
    if !household.members.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Member", "Email", "Role"]);
        for member in &household.members {
            let role = if household.is_admin(member.id) {
                "admin"
            } else {
                "member"
            };
            builder.push_record([member.label(), member.email.as_str(), role]);
        }
        println!("{}", builder.build().with(Style::rounded()));
    }
    Ok(())
}

pub fn print_invite(invite: &Invite, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(invite);
    }
    println!("{}: {}", "Invite code".cyan(), invite.invite_code.bold());
    println!("{}: {}", "Invite link".cyan(), invite.invite_url);
    Ok(())
}

pub fn print_dashboard(dashboard: &Dashboard, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(dashboard);
    }
    match &dashboard.household {
        Some(household) => println!("{}: {}", "Household".cyan(), household.name.bold()),
        None => println!("{}: {}", "Household".cyan(), "(none yet)".dimmed()),
    }
    println!(
        "{}: {}",
        "Open chores".cyan(),
        dashboard.pending_count().to_string().bold()
    );
    if !dashboard.my_chores.is_empty() {
        println!("{}", chore_table(&dashboard.my_chores));
    }
    Ok(())
}
