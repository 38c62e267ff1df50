use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::amounts::NumberConvention;
use crate::bonus::ResponsibleEntity;
use crate::projects::{ProjectStatus, ReferenceDate};

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Could not decode date {}: Format is YYYY-MM-DD, eg. 2025-03-20", s))
}

#[derive(Parser)]
#[command(name = "abnahme", about = "Project penalties, commissions, bonuses and warranties")]
pub struct Options {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding config.json, defaults to the current directory
    #[arg(short = 'V', long, global = true)]
    pub vault: Option<PathBuf>,

    /// Compute as if today were this date
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Late penalty owed on an amount
    Penalty {
        #[arg(allow_hyphen_values = true)]
        amount: String,

        #[arg(short = 'r', long)]
        reference_date: Option<String>,

        #[arg(short = 'c', long, value_enum, default_value_t = NumberConvention::Plain)]
        convention: NumberConvention,
    },
    /// Split of the commission pool of a deal
    Commission {
        #[arg(allow_hyphen_values = true)]
        total: String,

        #[arg(short = 'm', long)]
        mediator: bool,

        #[arg(short = 'c', long, value_enum, default_value_t = NumberConvention::Plain)]
        convention: NumberConvention,
    },
    /// Quality and quantity bonus
    Bonus {
        #[arg(long, allow_hyphen_values = true)]
        indoor_units: i64,

        #[arg(long)]
        monthly_projects: i64,

        #[arg(long)]
        no_quality: bool,

        #[arg(long)]
        no_quantity: bool,
    },
    /// Warranty state from an Abnahme date
    Warranty {
        #[arg(short = 'a', long)]
        acceptance_date: Option<String>,

        #[arg(short = 'f', long)]
        fallback_date: Option<String>,
    },
    /// Every project in the vault with its penalty, commission and bonus
    Projects {
        #[arg(short = 'e', long, value_enum, default_value_t)]
        entity: ResponsibleEntity,

        #[arg(short = 'r', long, value_enum, default_value_t)]
        reference: ReferenceDate,

        #[arg(short = 's', long, value_enum)]
        status: Option<ProjectStatus>,
    },
    /// Finished and archived projects with their warranty
    Archive {
        #[arg(short = 'r', long, value_enum, default_value_t)]
        reference: ReferenceDate,
    },
    /// Invoices in the vault with their late penalty
    Invoices,
    /// Move a project to its next lifecycle step
    Advance { id: String },
    /// Remove a project from the vault
    Delete { id: String },
    /// Add an invoice to the vault, or replace the one with the same id
    RecordInvoice {
        id: String,

        #[arg(allow_hyphen_values = true)]
        amount: String,

        #[arg(short = 'p', long)]
        project: String,

        #[arg(short = 's', long)]
        subcontractor: Option<String>,

        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        #[arg(short = 'c', long, value_enum, default_value_t = NumberConvention::Plain)]
        convention: NumberConvention,
    },
    /// Remove an invoice from the vault
    DeleteInvoice { id: String },
}

impl Command {
    pub fn screen_name(&self) -> &'static str {
        match self {
            Command::Penalty { .. } => "penalty",
            Command::Commission { .. } => "commission",
            Command::Bonus { .. } => "bonus",
            Command::Warranty { .. } => "warranty",
            Command::Projects { .. } => "projects",
            Command::Archive { .. } => "archive",
            Command::Invoices => "invoices",
            Command::Advance { .. } => "project status",
            Command::Delete { .. } => "project deletion",
            Command::RecordInvoice { .. } => "invoice",
            Command::DeleteInvoice { .. } => "invoice deletion",
        }
    }
}
