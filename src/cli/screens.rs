use chrono::NaiveDate;
use tracing::info;

use crate::amounts::Money;
use crate::bonus::{calculate_bonus, monthly_project_count, Bonus, ResponsibleEntity};
use crate::commission::{calculate_commission_split, CommissionSplit};
use crate::invoices::Invoice;
use crate::penalty::{late_penalty_since, LatePenalty};
use crate::projects::{Project, ProjectStatus, ReferenceDate};
use crate::vault::{InvoiceRepository, ProjectRepository};
use crate::warranty::{warranty_since, Warranty};

#[derive(Debug, PartialEq, Eq)]
pub struct ProjectLine {
    pub project: Project,
    pub penalty: LatePenalty,
    pub commission: CommissionSplit,
    pub monthly_project_count: i64,
    pub bonus: Bonus,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProjectsScreen {
    pub today: NaiveDate,
    pub entity: ResponsibleEntity,
    pub lines: Vec<ProjectLine>,
    pub total_penalty: Money,
    pub total_commission: Money,
    pub total_bonus: Money,
}

pub fn projects_screen<R: ProjectRepository>(
    repository: &R,
    today: &NaiveDate,
    entity: ResponsibleEntity,
    reference: ReferenceDate,
    status: Option<ProjectStatus>,
) -> Result<ProjectsScreen, String> {
    let projects = repository.projects()?;
    info!(projects = projects.len(), "computing projects screen");

    // Monthly volume counts every project of the entity, even those filtered out of the screen
    let lines: Vec<ProjectLine> = projects
        .iter()
        .filter(|project| status.map(|status| project.status == status).unwrap_or(true))
        .map(|project| {
            let monthly_project_count = monthly_project_count(&projects, project, entity);
            ProjectLine {
                penalty: late_penalty_since(project.contract_amount, project.reference_date(reference), today),
                commission: calculate_commission_split(project.contract_amount, project.has_mediator),
                bonus: calculate_bonus(&project.bonus_inputs(monthly_project_count)),
                monthly_project_count,
                project: project.clone(),
            }
        })
        .collect();

    Ok(ProjectsScreen {
        today: *today,
        entity,
        total_penalty: sum(lines.iter().map(|line| line.penalty.penalty))?,
        total_commission: sum(lines.iter().map(|line| line.commission.total_commission))?,
        total_bonus: sum(lines.iter().map(|line| line.bonus.total_bonus))?,
        lines,
    })
}

#[derive(Debug, PartialEq, Eq)]
pub struct ArchiveLine {
    pub project: Project,
    pub warranty: Warranty,
    pub penalty: LatePenalty,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ArchiveScreen {
    pub today: NaiveDate,
    pub lines: Vec<ArchiveLine>,
    pub total_net: Money,
}

/// Finished and archived projects, soonest warranty expiry first
pub fn archive_screen<R: ProjectRepository>(
    repository: &R,
    today: &NaiveDate,
    reference: ReferenceDate,
) -> Result<ArchiveScreen, String> {
    let mut lines: Vec<ArchiveLine> = repository
        .projects()?
        .into_iter()
        .filter(|project| project.status.is_closed())
        .map(|project| ArchiveLine {
            // Without a recorded Abnahme the warranty runs from the start of the works
            warranty: warranty_since(
                project.abnahme_date.or(project.actual_start).or(project.scheduled_start),
                today,
            ),
            penalty: late_penalty_since(project.contract_amount, project.reference_date(reference), today),
            project,
        })
        .collect();

    lines.sort_by_key(|line| (line.warranty.expiry_date.is_none(), line.warranty.expiry_date));

    Ok(ArchiveScreen {
        today: *today,
        total_net: sum(lines.iter().map(|line| line.penalty.net_amount))?,
        lines,
    })
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvoiceLine {
    pub invoice: Invoice,
    pub penalty: LatePenalty,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvoicesScreen {
    pub today: NaiveDate,
    pub lines: Vec<InvoiceLine>,
    pub total_amount: Money,
    pub total_penalty: Money,
    pub total_net: Money,
}

pub fn invoices_screen<R: InvoiceRepository>(repository: &R, today: &NaiveDate) -> Result<InvoicesScreen, String> {
    let lines: Vec<InvoiceLine> = repository
        .invoices()?
        .into_iter()
        .map(|invoice| InvoiceLine {
            penalty: late_penalty_since(invoice.amount, invoice.start, today),
            invoice,
        })
        .collect();

    Ok(InvoicesScreen {
        today: *today,
        total_amount: sum(lines.iter().map(|line| line.invoice.amount))?,
        total_penalty: sum(lines.iter().map(|line| line.penalty.penalty))?,
        total_net: sum(lines.iter().map(|line| line.penalty.net_amount))?,
        lines,
    })
}

pub fn advance_project<R: ProjectRepository>(
    repository: &R,
    id: &str,
    today: &NaiveDate,
) -> Result<ProjectStatus, String> {
    let mut project = repository
        .project(id)?
        .ok_or(format!("No project with id {}", id))?;
    let status = project.advance(today)?;
    repository.save_project(&project)?;
    info!(project = id, status = %status, "project advanced");
    Ok(status)
}

pub fn delete_project<R: ProjectRepository>(repository: &R, id: &str) -> Result<(), String> {
    if !repository.delete_project(id)? {
        return Err(format!("No project with id {}", id));
    }
    info!(project = id, "project deleted");
    Ok(())
}

/// Stores `invoice`, replacing any invoice with the same id
pub fn record_invoice<R: InvoiceRepository>(repository: &R, invoice: &Invoice) -> Result<(), String> {
    if invoice.project.trim().is_empty() {
        return Err(format!("Invoice {} names no project", invoice.id));
    }
    repository.save_invoice(invoice)?;
    info!(invoice = %invoice.id, "invoice recorded");
    Ok(())
}

pub fn delete_invoice<R: InvoiceRepository>(repository: &R, id: &str) -> Result<(), String> {
    if !repository.delete_invoice(id)? {
        return Err(format!("No invoice with id {}", id));
    }
    info!(invoice = id, "invoice deleted");
    Ok(())
}

fn sum(mut amounts: impl Iterator<Item = Money>) -> Result<Money, String> {
    amounts.try_fold(Money::zero(), |total, amount| {
        total
            .checked_add(amount)
            .ok_or(format!("Total overflows after {}", total))
    })
}
