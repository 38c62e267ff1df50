use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amounts::{Money, NumberConvention, RawAmount};
use crate::projects::{ingest_amount, ingest_date, record_id};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub project: String,
    pub subcontractor: Option<String>,
    pub amount: Money,
    pub start: Option<NaiveDate>,
}

/// An invoice as the browser kept it in local storage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub project: Option<String>,
    pub subcontractor: Option<String>,
    pub amount: Option<RawAmount>,
    pub start: Option<String>,
}

impl InvoiceRecord {
    pub fn into_invoice(self, convention: NumberConvention) -> Invoice {
        Invoice {
            project: self.project.unwrap_or_default(),
            subcontractor: self.subcontractor.filter(|name| !name.trim().is_empty()),
            amount: ingest_amount(&self.id, self.amount.as_ref(), convention),
            start: ingest_date(&self.id, "start", self.start.as_deref()),
            id: self.id,
        }
    }
}

impl InvoiceRecord {
    pub fn from_invoice(invoice: &Invoice, convention: NumberConvention) -> InvoiceRecord {
        InvoiceRecord {
            id: invoice.id.clone(),
            project: Some(invoice.project.clone()),
            subcontractor: invoice.subcontractor.clone(),
            amount: Some(RawAmount::from_money(&invoice.amount, convention)),
            start: invoice.start.map(|date| date.to_string()),
        }
    }
}
