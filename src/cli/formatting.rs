use chrono::NaiveDate;
use comfy_table::Table;

use crate::amounts::Money;
use crate::bonus::{Bonus, ResponsibleEntity};
use crate::cli::screens::{ArchiveScreen, InvoicesScreen, ProjectsScreen};
use crate::commission::CommissionSplit;
use crate::invoices::Invoice;
use crate::penalty::LatePenalty;
use crate::projects::ProjectStatus;
use crate::warranty::Warranty;

pub fn format_penalty(amount: Money, penalty: &LatePenalty) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Days late", "Rate", "Penalty", "Net amount"]);
    table.add_row(vec![
        penalty.days_late.to_string(),
        format!("{}%", penalty.penalty_percentage),
        penalty.penalty.to_string(),
        penalty.net_amount.to_string(),
    ]);

    let verdict = if penalty.is_overdue { "Overdue" } else { "Not overdue" };
    screen(vec![
        title(&format!("Late penalty on {}", amount)),
        format!("{}\n{}", verdict, table),
    ])
}

pub fn format_commission(total: Money, split: &CommissionSplit) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Share", "Amount"]);
    table.add_row(vec!["Company".to_string(), split.company_share.to_string()]);
    table.add_row(vec!["Partner".to_string(), split.partner_share.to_string()]);
    table.add_row(vec!["Mediator".to_string(), split.mediator_share.to_string()]);
    table.add_row(vec!["Total".to_string(), split.shares_total().to_string()]);

    screen(vec![title(&format!("Commission on {}", total)), table.to_string()])
}

pub fn format_bonus(bonus: &Bonus) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Bonus", "Amount"]);
    table.add_row(vec!["Quality".to_string(), bonus.quality_bonus.to_string()]);
    table.add_row(vec![format!("Quantity ({})", bonus.tier), bonus.quantity_bonus.to_string()]);
    table.add_row(vec!["Total".to_string(), bonus.total_bonus.to_string()]);

    screen(vec![title("Bonus"), table.to_string()])
}

pub fn format_warranty(warranty: &Warranty) -> String {
    screen(vec![
        title(&format!("Warranty: {}", warranty.status)),
        format!("Expires on {}", optional_date(&warranty.expiry_date)),
    ])
}

pub fn format_projects_screen(screen_data: &ProjectsScreen) -> String {
    let mut components = vec![title(&format!("Projects as of {}", screen_data.today))];

    let content = if screen_data.lines.is_empty() {
        "No projects in the vault".to_string()
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "ID",
            "Name",
            "Status",
            "Amount",
            "Days late",
            "Penalty",
            "Commission",
            "Mediator",
            "Projects this month",
            "Tier",
            "Bonus",
        ]);

        for line in screen_data.lines.iter() {
            table.add_row(vec![
                line.project.id.clone(),
                line.project.name.clone(),
                line.project.status.to_string(),
                line.project.contract_amount.to_string(),
                line.penalty.days_late.to_string(),
                line.penalty.penalty.to_string(),
                line.commission.total_commission.to_string(),
                (if line.project.has_mediator { "✅" } else { "" }).into(),
                line.monthly_project_count.to_string(),
                line.bonus.tier.to_string(),
                line.bonus.total_bonus.to_string(),
            ]);
        }

        table.add_row(vec![
            "Total".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            screen_data.total_penalty.to_string(),
            screen_data.total_commission.to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            screen_data.total_bonus.to_string(),
        ]);
        table.to_string()
    };
    components.push(content);
    components.push(format!("Monthly volume counted per {}", entity_label(screen_data.entity)));

    screen(components)
}

pub fn format_archive_screen(screen_data: &ArchiveScreen) -> String {
    let mut components = vec![title(&format!("Archive as of {}", screen_data.today))];

    let content = if screen_data.lines.is_empty() {
        "No finished projects".to_string()
    } else {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Name", "Status", "Abnahme", "Warranty until", "Warranty", "Net amount"]);

        for line in screen_data.lines.iter() {
            table.add_row(vec![
                line.project.id.clone(),
                line.project.name.clone(),
                line.project.status.to_string(),
                optional_date(&line.project.abnahme_date),
                optional_date(&line.warranty.expiry_date),
                line.warranty.status.to_string(),
                line.penalty.net_amount.to_string(),
            ]);
        }

        table.add_row(vec![
            "Total".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            screen_data.total_net.to_string(),
        ]);
        table.to_string()
    };
    components.push(content);

    screen(components)
}

pub fn format_invoices_screen(screen_data: &InvoicesScreen) -> String {
    let mut components = vec![title(&format!("Invoices as of {}", screen_data.today))];

    let content = if screen_data.lines.is_empty() {
        "No invoices in the vault".to_string()
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "ID",
            "Project",
            "Subcontractor",
            "Amount",
            "Start",
            "Days late",
            "Penalty",
            "Net amount",
        ]);

        for line in screen_data.lines.iter() {
            table.add_row(vec![
                line.invoice.id.clone(),
                line.invoice.project.clone(),
                line.invoice.subcontractor.clone().unwrap_or_default(),
                line.invoice.amount.to_string(),
                optional_date(&line.invoice.start),
                line.penalty.days_late.to_string(),
                line.penalty.penalty.to_string(),
                line.penalty.net_amount.to_string(),
            ]);
        }

        table.add_row(vec![
            "Total".to_string(),
            "".to_string(),
            "".to_string(),
            screen_data.total_amount.to_string(),
            "".to_string(),
            "".to_string(),
            screen_data.total_penalty.to_string(),
            screen_data.total_net.to_string(),
        ]);
        table.to_string()
    };
    components.push(content);

    screen(components)
}

pub fn format_advance(id: &str, status: ProjectStatus) -> String {
    screen(vec![title(&format!("Project {} is now {}", id, status))])
}

pub fn format_deleted(kind: &str, id: &str) -> String {
    screen(vec![title(&format!("{} {} deleted", kind, id))])
}

pub fn format_recorded_invoice(invoice: &Invoice) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Project", "Subcontractor", "Amount", "Start"]);
    table.add_row(vec![
        invoice.project.clone(),
        invoice.subcontractor.clone().unwrap_or_default(),
        invoice.amount.to_string(),
        optional_date(&invoice.start),
    ]);

    screen(vec![title(&format!("Invoice {} recorded", invoice.id)), table.to_string()])
}

fn entity_label(entity: ResponsibleEntity) -> &'static str {
    match entity {
        ResponsibleEntity::Subcontractor => "subcontractor",
        ResponsibleEntity::Partner => "partner",
        ResponsibleEntity::Contractor => "contractor",
    }
}

fn optional_date(date: &Option<NaiveDate>) -> String {
    date.map(|date| date.to_string()).unwrap_or("-".to_string())
}

fn screen(mut components: Vec<String>) -> String {
    components.push(format!("Release: {}", env!("RELEASE")));
    components.join("\n\n")
}

fn title(string: &str) -> String {
    let string_length = string.chars().count();
    string.to_string() + "\n" + &"=".repeat(string_length)
}
