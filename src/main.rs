//! Command-line front end for the attendee lookup.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use attendees::api::DiscourseClient;
use attendees::attendees::AttendeeQuery;
use attendees::config::Config;
use attendees::env::Env;
use attendees::groups;
use attendees::logging;
use attendees::models::Credentials;

use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use cli::args::{CheckArgs, Cli, Command, GroupArgs, ListArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    logging::init(&env, cli.verbose);

    let work_dir = std::env::current_dir().ok();
    let mut config =
        Config::load(work_dir.as_deref(), &env).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Command::Check(args) => run_check(args, &config),
        Command::GroupId(args) => run_group_id(args, &config).await,
        Command::Members(args) => run_members(args, &config).await,
        Command::List(args) => run_list(args, &config).await,
    }
}

fn client(config: &Config) -> Result<DiscourseClient> {
    DiscourseClient::from_config(&config.forum).context("failed to set up forum client")
}

fn require_credentials(config: &Config) -> Result<Credentials> {
    match config.credentials.resolve() {
        Some(creds) => Ok(creds),
        None => bail!(
            "this command needs API credentials: pass --api-username and --api-key \
             or set {} and {}",
            attendees::constants::ENV_API_USERNAME,
            attendees::constants::ENV_API_KEY,
        ),
    }
}

/// Report usernames that break the naming rules.
fn run_check(args: CheckArgs, config: &Config) -> Result<()> {
    let usernames = args.input.collect()?;
    if usernames.is_empty() {
        bail!("no usernames given: pass usernames or --file");
    }

    let policy = config.usernames;
    let invalid = policy.check_usernames(&usernames);
    if invalid.is_empty() {
        println!(
            "  {} all {} usernames are valid",
            "✔".green().bold(),
            usernames.len()
        );
        return Ok(());
    }

    for username in &invalid {
        let reason = policy
            .violation(username)
            .map(|v| v.to_string())
            .unwrap_or_default();
        println!("  {} {}  {}", "✖".red().bold(), username.bold(), reason.dimmed());
    }
    bail!("{} of {} usernames are invalid", invalid.len(), usernames.len());
}

/// Print the numeric id of a group.
async fn run_group_id(args: GroupArgs, config: &Config) -> Result<()> {
    let client = client(config)?;
    let creds = require_credentials(config)?;
    let id = groups::resolve_group_id(&client, &args.name, &creds).await?;
    println!("{id}");
    Ok(())
}

/// Print the members of a group, one per line.
async fn run_members(args: GroupArgs, config: &Config) -> Result<()> {
    let client = client(config)?;
    let creds = require_credentials(config)?;
    let members = groups::group_members(&client, &args.name, &creds).await?;
    for member in &members {
        println!("{member}");
    }
    Ok(())
}

/// Fetch attendee details and print them in the requested format.
async fn run_list(args: ListArgs, config: &Config) -> Result<()> {
    args.validate_input().map_err(anyhow::Error::msg)?;
    let client = client(config)?;
    let credentials = config.credentials.resolve();

    let mut query = AttendeeQuery::new(args.input.collect()?)
        .with_credentials(credentials.clone())
        .with_emails(args.emails);

    if let Some(ref group) = args.group {
        let Some(ref creds) = credentials else {
            bail!("--group needs API credentials: pass --api-username and --api-key");
        };
        let members = groups::group_members(&client, group, creds)
            .await
            .with_context(|| format!("failed to list members of '{group}'"))?;
        query.extend(members);
    }

    let invalid = config.usernames.check_usernames(&query.usernames);
    if !invalid.is_empty() {
        tracing::warn!(usernames = ?invalid, "requesting usernames the forum would reject");
    }

    let table = query
        .run(&client)
        .await
        .context("failed to fetch attendee details")?;
    print!("{}", args.format.render(&table));
    Ok(())
}
