use std::env::current_dir;

use clap::Parser;
use tracing::{debug, Level};

use crate::amounts::{Money, RawAmount};
use crate::invoices::Invoice;
use crate::bonus::{calculate_bonus, BonusInputs};
use crate::clock::clock_for;
use crate::commission::calculate_commission_split;
use crate::penalty::calculate_late_penalty;
use crate::vault::VaultImpl;
use crate::warranty::classify_warranty_status;
use argument_parsing::{Command, Options};

mod argument_parsing;
mod formatting;
mod screens;

pub fn run() {
    let options = Options::parse();
    init_logging(options.verbose);

    let screen_name = options.command.screen_name();
    let result: Result<String, String> = (|| {
        let today = clock_for(options.today).today();
        debug!(%today, command = screen_name, "computing");

        let vault_path = match &options.vault {
            Some(a) => a.clone(),
            None => current_dir().map_err(|e| e.to_string())?,
        };
        let vault = VaultImpl { path: vault_path };

        match options.command {
            Command::Penalty { amount, reference_date, convention } => {
                let amount = Money::from_raw(Some(&RawAmount::from(amount.as_str())), convention);
                let penalty = calculate_late_penalty(amount, reference_date.as_deref(), &today);
                Ok(formatting::format_penalty(amount, &penalty))
            }
            Command::Commission { total, mediator, convention } => {
                let total = Money::from_raw(Some(&RawAmount::from(total.as_str())), convention);
                Ok(formatting::format_commission(total, &calculate_commission_split(total, mediator)))
            }
            Command::Bonus { indoor_units, monthly_projects, no_quality, no_quantity } => {
                let bonus = calculate_bonus(&BonusInputs {
                    indoor_unit_count: indoor_units,
                    quality_bonus_enabled: !no_quality,
                    quantity_bonus_enabled: !no_quantity,
                    monthly_project_count: monthly_projects,
                });
                Ok(formatting::format_bonus(&bonus))
            }
            Command::Warranty { acceptance_date, fallback_date } => {
                let warranty =
                    classify_warranty_status(acceptance_date.as_deref(), fallback_date.as_deref(), &today);
                Ok(formatting::format_warranty(&warranty))
            }
            Command::Projects { entity, reference, status } => {
                let screen = screens::projects_screen(&vault, &today, entity, reference, status)?;
                Ok(formatting::format_projects_screen(&screen))
            }
            Command::Archive { reference } => {
                let screen = screens::archive_screen(&vault, &today, reference)?;
                Ok(formatting::format_archive_screen(&screen))
            }
            Command::Invoices => {
                let screen = screens::invoices_screen(&vault, &today)?;
                Ok(formatting::format_invoices_screen(&screen))
            }
            Command::Advance { id } => {
                let status = screens::advance_project(&vault, &id, &today)?;
                Ok(formatting::format_advance(&id, status))
            }
            Command::Delete { id } => {
                screens::delete_project(&vault, &id)?;
                Ok(formatting::format_deleted("Project", &id))
            }
            Command::RecordInvoice { id, amount, project, subcontractor, start, convention } => {
                let invoice = Invoice {
                    amount: Money::from_raw(Some(&RawAmount::from(amount.as_str())), convention),
                    id,
                    project,
                    subcontractor,
                    start,
                };
                screens::record_invoice(&vault, &invoice)?;
                Ok(formatting::format_recorded_invoice(&invoice))
            }
            Command::DeleteInvoice { id } => {
                screens::delete_invoice(&vault, &id)?;
                Ok(formatting::format_deleted("Invoice", &id))
            }
        }
    })();

    match result {
        Ok(screen) => println!("{}", screen),
        Err(error) => println!("Could not compute {}: {}", screen_name, error),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
