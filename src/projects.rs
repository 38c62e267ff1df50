use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::amounts::{Money, NumberConvention, RawAmount};
use crate::bonus::{BonusInputs, MonthlyCountable, ResponsibleEntity};
use crate::dates::parse_calendar_date;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Scheduled,
    #[serde(alias = "in progress")]
    InProgress,
    Abnahme,
    Finished,
    Archived,
}

impl ProjectStatus {
    /// The following lifecycle step, None once archived
    pub fn next(&self) -> Option<ProjectStatus> {
        match self {
            ProjectStatus::Scheduled => Some(ProjectStatus::InProgress),
            ProjectStatus::InProgress => Some(ProjectStatus::Abnahme),
            ProjectStatus::Abnahme => Some(ProjectStatus::Finished),
            ProjectStatus::Finished => Some(ProjectStatus::Archived),
            ProjectStatus::Archived => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ProjectStatus::Finished | ProjectStatus::Archived)
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProjectStatus::Scheduled => "Scheduled",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Abnahme => "Abnahme",
            ProjectStatus::Finished => "Finished",
            ProjectStatus::Archived => "Archived",
        };
        write!(f, "{}", label)
    }
}

/// Which stored date a caller measures lateness from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReferenceDate {
    #[default]
    ScheduledStart,
    ActualStart,
    Abnahme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectOrigin {
    Backend,
    Local,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub contract_amount: Money,
    pub scheduled_start: Option<NaiveDate>,
    pub actual_start: Option<NaiveDate>,
    pub abnahme_date: Option<NaiveDate>,
    pub subcontractor: Option<String>,
    pub partner: Option<String>,
    pub contractor: Option<String>,
    pub indoor_units: i64,
    pub has_mediator: bool,
    pub quality_bonus_enabled: bool,
    pub quantity_bonus_enabled: bool,
    pub origin: ProjectOrigin,
}

impl Project {
    pub fn reference_date(&self, reference: ReferenceDate) -> Option<NaiveDate> {
        match reference {
            ReferenceDate::ScheduledStart => self.scheduled_start,
            ReferenceDate::ActualStart => self.actual_start,
            ReferenceDate::Abnahme => self.abnahme_date,
        }
    }

    pub fn bonus_inputs(&self, monthly_project_count: i64) -> BonusInputs {
        BonusInputs {
            indoor_unit_count: self.indoor_units,
            quality_bonus_enabled: self.quality_bonus_enabled,
            quantity_bonus_enabled: self.quantity_bonus_enabled,
            monthly_project_count,
        }
    }

    /// Moves the project one lifecycle step forward.
    ///
    /// Starting work and reaching the Abnahme stamp `today` on the matching date unless one was
    /// already recorded.
    pub fn advance(&mut self, today: &NaiveDate) -> Result<ProjectStatus, String> {
        let next = self
            .status
            .next()
            .ok_or(format!("Project {} is already archived", self.id))?;

        match next {
            ProjectStatus::InProgress => {
                self.actual_start.get_or_insert(*today);
            }
            ProjectStatus::Abnahme => {
                self.abnahme_date.get_or_insert(*today);
            }
            _ => {}
        }

        self.status = next;
        Ok(next)
    }
}

impl MonthlyCountable for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn responsible(&self, entity: ResponsibleEntity) -> Option<&str> {
        match entity {
            ResponsibleEntity::Subcontractor => self.subcontractor.as_deref(),
            ResponsibleEntity::Partner => self.partner.as_deref(),
            ResponsibleEntity::Contractor => self.contractor.as_deref(),
        }
    }

    fn bonus_reference_date(&self) -> Option<NaiveDate> {
        self.actual_start.or(self.scheduled_start)
    }
}

/* Stored shapes */

/// A project row as the relational backend returns it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BackendProjectRow {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub contract_amount: Option<RawAmount>,
    pub scheduled_start: Option<String>,
    pub actual_start: Option<String>,
    pub abnahme_date: Option<String>,
    pub subcontractor: Option<String>,
    pub partner: Option<String>,
    pub contractor: Option<String>,
    pub indoor_units: Option<i64>,
    pub has_mediator: Option<bool>,
    pub quality_bonus: Option<bool>,
    pub quantity_bonus: Option<bool>,
}

/// A project as the browser kept it in local storage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalProjectRecord {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub amount: Option<RawAmount>,
    pub start: Option<String>,
    pub actual_start: Option<String>,
    pub abnahme_date: Option<String>,
    pub subcontractor: Option<String>,
    pub partner: Option<String>,
    pub contractor: Option<String>,
    pub indoor_units: Option<i64>,
    /// Name of the mediator who brought the deal in, if any
    pub mediator: Option<String>,
    pub quality_bonus: Option<bool>,
    pub quantity_bonus: Option<bool>,
}

pub enum ProjectSource {
    Backend(BackendProjectRow),
    Local(LocalProjectRecord),
}

impl ProjectSource {
    pub fn into_project(self, convention: NumberConvention) -> Project {
        match self {
            ProjectSource::Backend(row) => {
                let id = row.id;
                Project {
                    name: row.name.unwrap_or_default(),
                    status: row.status.unwrap_or_default(),
                    contract_amount: ingest_amount(&id, row.contract_amount.as_ref(), convention),
                    scheduled_start: ingest_date(&id, "scheduled_start", row.scheduled_start.as_deref()),
                    actual_start: ingest_date(&id, "actual_start", row.actual_start.as_deref()),
                    abnahme_date: ingest_date(&id, "abnahme_date", row.abnahme_date.as_deref()),
                    subcontractor: non_empty(row.subcontractor),
                    partner: non_empty(row.partner),
                    contractor: non_empty(row.contractor),
                    indoor_units: row.indoor_units.unwrap_or(0),
                    has_mediator: row.has_mediator.unwrap_or(false),
                    quality_bonus_enabled: row.quality_bonus.unwrap_or(false),
                    quantity_bonus_enabled: row.quantity_bonus.unwrap_or(false),
                    origin: ProjectOrigin::Backend,
                    id,
                }
            }
            ProjectSource::Local(record) => {
                let id = record.id;
                Project {
                    name: record.name.unwrap_or_default(),
                    status: record.status.unwrap_or_default(),
                    contract_amount: ingest_amount(&id, record.amount.as_ref(), convention),
                    scheduled_start: ingest_date(&id, "start", record.start.as_deref()),
                    actual_start: ingest_date(&id, "actualStart", record.actual_start.as_deref()),
                    abnahme_date: ingest_date(&id, "abnahmeDate", record.abnahme_date.as_deref()),
                    subcontractor: non_empty(record.subcontractor),
                    partner: non_empty(record.partner),
                    contractor: non_empty(record.contractor),
                    indoor_units: record.indoor_units.unwrap_or(0),
                    has_mediator: non_empty(record.mediator).is_some(),
                    quality_bonus_enabled: record.quality_bonus.unwrap_or(false),
                    quantity_bonus_enabled: record.quantity_bonus.unwrap_or(false),
                    origin: ProjectOrigin::Local,
                    id,
                }
            }
        }
    }
}

impl BackendProjectRow {
    /// Stored row of `project`, amounts written in `convention`
    pub fn from_project(project: &Project, convention: NumberConvention) -> BackendProjectRow {
        BackendProjectRow {
            id: project.id.clone(),
            name: Some(project.name.clone()),
            status: Some(project.status),
            contract_amount: Some(RawAmount::from_money(&project.contract_amount, convention)),
            scheduled_start: project.scheduled_start.map(|date| date.to_string()),
            actual_start: project.actual_start.map(|date| date.to_string()),
            abnahme_date: project.abnahme_date.map(|date| date.to_string()),
            subcontractor: project.subcontractor.clone(),
            partner: project.partner.clone(),
            contractor: project.contractor.clone(),
            indoor_units: Some(project.indoor_units),
            has_mediator: Some(project.has_mediator),
            quality_bonus: Some(project.quality_bonus_enabled),
            quantity_bonus: Some(project.quantity_bonus_enabled),
        }
    }
}

impl LocalProjectRecord {
    /// Writes `project` back over this record, keeping what the record knows and the project doesn't
    pub fn update_from(&mut self, project: &Project, convention: NumberConvention) {
        self.name = Some(project.name.clone());
        self.status = Some(project.status);
        self.amount = Some(RawAmount::from_money(&project.contract_amount, convention));
        self.start = project.scheduled_start.map(|date| date.to_string());
        self.actual_start = project.actual_start.map(|date| date.to_string());
        self.abnahme_date = project.abnahme_date.map(|date| date.to_string());
        self.subcontractor = project.subcontractor.clone();
        self.partner = project.partner.clone();
        self.contractor = project.contractor.clone();
        self.indoor_units = Some(project.indoor_units);
        if !project.has_mediator {
            self.mediator = None;
        } else if self.mediator.is_none() {
            self.mediator = Some("Unknown mediator".to_string());
        }
        self.quality_bonus = Some(project.quality_bonus_enabled);
        self.quantity_bonus = Some(project.quantity_bonus_enabled);
    }
}

pub(crate) fn ingest_amount(id: &str, raw: Option<&RawAmount>, convention: NumberConvention) -> Money {
    let amount = Money::from_raw(raw, convention);
    if let Some(RawAmount::Text(text)) = raw {
        if amount == Money::zero() && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
            warn!(record = id, amount = %text, "amount could not be read and counts as zero");
        }
    }
    amount
}

pub(crate) fn ingest_date(id: &str, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let date = parse_calendar_date(raw);
    if date.is_none() && !raw.trim().is_empty() {
        warn!(record = id, field, value = raw, "date could not be read and is ignored");
    }
    date
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

// Backend ids are numbers or uuids, local storage ids are whatever the page generated
pub(crate) fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid record id: {}", other))),
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::{BackendProjectRow, LocalProjectRecord, Project, ProjectOrigin, ProjectSource, ProjectStatus};
    use crate::amounts::{Money, NumberConvention};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn backend_project() -> Project {
        let row: BackendProjectRow = serde_json::from_str(
            r#"{
                "id": 17,
                "name": "Bürohaus Lindenstraße",
                "status": "in_progress",
                "contract_amount": "€ 48.200,00",
                "scheduled_start": "2025-03-03",
                "actual_start": "2025-03-05T07:30:00",
                "abnahme_date": null,
                "subcontractor": "Klima Huber",
                "partner": "Nord GmbH",
                "contractor": "",
                "indoor_units": 12,
                "has_mediator": true,
                "quality_bonus": true
            }"#,
        )
        .expect("valid row");
        ProjectSource::Backend(row).into_project(NumberConvention::German)
    }

    #[test]
    fn backend_row__mapped() {
        assert_eq!(
            backend_project(),
            Project {
                id: "17".to_string(),
                name: "Bürohaus Lindenstraße".to_string(),
                status: ProjectStatus::InProgress,
                contract_amount: Money::euro("48200"),
                scheduled_start: Some(date(2025, 3, 3)),
                actual_start: Some(date(2025, 3, 5)),
                abnahme_date: None,
                subcontractor: Some("Klima Huber".to_string()),
                partner: Some("Nord GmbH".to_string()),
                contractor: None,
                indoor_units: 12,
                has_mediator: true,
                quality_bonus_enabled: true,
                quantity_bonus_enabled: false,
                origin: ProjectOrigin::Backend,
            }
        )
    }

    #[test]
    fn local_record__mapped() {
        let record: LocalProjectRecord = serde_json::from_str(
            r#"{
                "id": "p-1699",
                "name": "Praxis Dr. Weber",
                "amount": 12500.5,
                "start": "01.04.2025",
                "abnahmeDate": "not yet",
                "subcontractor": "Kälte Schmidt",
                "indoorUnits": 3,
                "mediator": "M. Yilmaz",
                "quantityBonus": true
            }"#,
        )
        .expect("valid record");
        let project = ProjectSource::Local(record).into_project(NumberConvention::German);

        assert_eq!(project.id, "p-1699");
        assert_eq!(project.status, ProjectStatus::Scheduled);
        assert_eq!(project.contract_amount, Money::euro("12500.5"));
        assert_eq!(project.scheduled_start, Some(date(2025, 4, 1)));
        assert_eq!(project.abnahme_date, None);
        assert!(project.has_mediator);
        assert!(!project.quality_bonus_enabled);
        assert!(project.quantity_bonus_enabled);
        assert_eq!(project.origin, ProjectOrigin::Local);
    }

    #[test]
    fn local_record__blank_mediator_is_no_mediator() {
        let record: LocalProjectRecord =
            serde_json::from_str(r#"{"id": "p-1", "mediator": "  "}"#).expect("valid record");
        assert!(!ProjectSource::Local(record).into_project(NumberConvention::German).has_mediator);
    }

    #[test]
    fn invalid_id__rejected() {
        assert!(serde_json::from_str::<BackendProjectRow>(r#"{"id": true}"#).is_err())
    }

    #[test]
    fn lifecycle() {
        let mut status = ProjectStatus::Scheduled;
        let mut visited = vec![status];
        while let Some(next) = status.next() {
            status = next;
            visited.push(status);
        }
        assert_eq!(
            visited,
            vec![
                ProjectStatus::Scheduled,
                ProjectStatus::InProgress,
                ProjectStatus::Abnahme,
                ProjectStatus::Finished,
                ProjectStatus::Archived
            ]
        );
    }

    #[test]
    fn advance__to_abnahme_stamps_date() {
        let mut project = backend_project();
        assert_eq!(project.advance(&date(2025, 6, 2)), Ok(ProjectStatus::Abnahme));
        assert_eq!(project.abnahme_date, Some(date(2025, 6, 2)));
        // Already started, the recorded start is kept
        assert_eq!(project.actual_start, Some(date(2025, 3, 5)));
    }

    #[test]
    fn advance__archived_fails() {
        let mut project = backend_project();
        project.status = ProjectStatus::Archived;
        assert_eq!(project.advance(&date(2025, 6, 2)), Err("Project 17 is already archived".to_string()));
    }

    #[test]
    fn backend_row__written_back() {
        let project = backend_project();
        let row = BackendProjectRow::from_project(&project, NumberConvention::German);
        let reread = ProjectSource::Backend(row).into_project(NumberConvention::German);
        assert_eq!(reread, project);
    }

    #[test]
    fn backend_row__large_amount_written_back_exactly() {
        for convention in [NumberConvention::German, NumberConvention::Plain] {
            let mut project = backend_project();
            project.contract_amount = Money::euro("12345678901234567.89");

            let row = BackendProjectRow::from_project(&project, convention);
            let reread = ProjectSource::Backend(row).into_project(convention);
            assert_eq!(reread.contract_amount, project.contract_amount, "{:?}", convention);
        }
    }

    #[test]
    fn local_record__written_back_keeps_mediator_name() {
        let mut record: LocalProjectRecord =
            serde_json::from_str(r#"{"id": "p-2", "mediator": "M. Yilmaz", "amount": "3.000,00"}"#)
                .expect("valid record");
        let mut project = ProjectSource::Local(record.clone()).into_project(NumberConvention::German);
        project.indoor_units = 5;

        record.update_from(&project, NumberConvention::German);
        assert_eq!(record.mediator, Some("M. Yilmaz".to_string()));
        assert_eq!(record.indoor_units, Some(5));
        let reread = ProjectSource::Local(record).into_project(NumberConvention::German);
        assert_eq!(reread, project);
    }
}
