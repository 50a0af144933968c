//! Clap argument types and validation.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use attendees::config::Config;
use attendees::models::AttendeeTable;

/// Look up forum attendees, usernames and groups.
#[derive(Parser, Debug)]
#[command(name = "attendees", version = attendees::constants::VERSION)]
pub struct Cli {
    /// Base URL of the forum (overrides config and ATTENDEES_FORUM_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub forum_url: Option<String>,

    /// API username for privileged lookups.
    #[arg(long, global = true)]
    pub api_username: Option<String>,

    /// API key for privileged lookups.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply CLI flags on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref url) = self.forum_url {
            config.forum.base_url = url.clone();
        }
        if let Some(ref username) = self.api_username {
            config.credentials.api_username = Some(username.clone());
        }
        if let Some(ref key) = self.api_key {
            config.credentials.api_key = Some(key.clone());
        }
    }
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Report usernames that break the forum's naming rules.
    Check(CheckArgs),

    /// Print the numeric id of a group.
    GroupId(GroupArgs),

    /// List the members of a group, one username per line.
    Members(GroupArgs),

    /// Fetch attendee profiles and print them as a table.
    List(ListArgs),
}

/// Usernames given on the command line and/or in a file.
#[derive(clap::Args, Debug)]
pub struct UsernameArgs {
    /// Usernames to process.
    pub usernames: Vec<String>,

    /// File with one username per line.
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

impl UsernameArgs {
    /// Command-line usernames followed by those read from `--file`.
    pub fn collect(&self) -> anyhow::Result<Vec<String>> {
        let mut usernames = self.usernames.clone();
        if let Some(ref path) = self.file {
            usernames.extend(super::read_usernames(path)?);
        }
        Ok(usernames)
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty() && self.file.is_none()
    }
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: UsernameArgs,
}

/// Arguments for the `group-id` and `members` subcommands.
#[derive(Parser, Debug)]
pub struct GroupArgs {
    /// Exact, case-sensitive group name.
    pub name: String,
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub input: UsernameArgs,

    /// Also include every member of this group.
    #[arg(long, short)]
    pub group: Option<String>,

    /// Retrieve email addresses (requires API credentials).
    #[arg(long, default_value_t = false)]
    pub emails: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,
}

impl ListArgs {
    /// Validate that at least one username source is provided.
    pub fn validate_input(&self) -> Result<(), String> {
        if self.input.is_empty() && self.group.is_none() {
            return Err("no usernames given: pass usernames, --file, or --group".to_string());
        }
        Ok(())
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Csv,
}

impl OutputFormat {
    /// Render the table using the renderer for this format.
    pub fn render(&self, table: &AttendeeTable) -> String {
        use attendees::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => attendees::output::terminal::TerminalRenderer.render(table),
            OutputFormat::Json => attendees::output::json::JsonRenderer.render(table),
            OutputFormat::Csv => attendees::output::csv::CsvRenderer.render(table),
        }
    }
}
