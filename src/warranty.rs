use std::fmt::{Display, Formatter};

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::dates::parse_optional_calendar_date;

pub const WARRANTY_YEARS: u32 = 5;
// Months are approximated as 30 days when deciding whether a warranty is about to expire
const DAYS_PER_MONTH: Decimal = dec!(30);
const EXPIRING_WITHIN_MONTHS: Decimal = dec!(6);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarrantyStatus {
    InWarranty,
    Expiring,
    Expired,
    NoAcceptanceDate,
}

impl Display for WarrantyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WarrantyStatus::InWarranty => "In Warranty",
            WarrantyStatus::Expiring => "Expiring",
            WarrantyStatus::Expired => "Expired",
            WarrantyStatus::NoAcceptanceDate => "No Acceptance Date",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warranty {
    pub status: WarrantyStatus,
    pub expiry_date: Option<NaiveDate>,
}

/// Warranty state of a project accepted on `acceptance_date`, or on `fallback_date` when the
/// acceptance date is missing or unreadable.
pub fn classify_warranty_status(
    acceptance_date: Option<&str>,
    fallback_date: Option<&str>,
    today: &NaiveDate,
) -> Warranty {
    let start = parse_optional_calendar_date(acceptance_date)
        .or_else(|| parse_optional_calendar_date(fallback_date));
    warranty_since(start, today)
}

pub fn warranty_since(start: Option<NaiveDate>, today: &NaiveDate) -> Warranty {
    match start {
        Some(start) => warranty_from(&start, today),
        None => Warranty {
            status: WarrantyStatus::NoAcceptanceDate,
            expiry_date: None,
        },
    }
}

pub fn warranty_from(acceptance_date: &NaiveDate, today: &NaiveDate) -> Warranty {
    // Adding calendar months clamps Feb 29 to Feb 28 when the expiry year is not a leap year.
    // Only dates near the end of chrono's range cannot be shifted; they never expire.
    let Some(expiry_date) = acceptance_date.checked_add_months(Months::new(WARRANTY_YEARS * 12))
    else {
        return Warranty {
            status: WarrantyStatus::InWarranty,
            expiry_date: None,
        };
    };

    // The warranty is measured from some moment during `today`, so the expiry day itself is
    // already lost and only the whole days after today remain.
    let status = if today >= &expiry_date {
        WarrantyStatus::Expired
    } else {
        let remaining_days = (expiry_date - *today).num_days() - 1;
        let months_to_expiry = Decimal::from(remaining_days) / DAYS_PER_MONTH;
        if months_to_expiry <= EXPIRING_WITHIN_MONTHS {
            WarrantyStatus::Expiring
        } else {
            WarrantyStatus::InWarranty
        }
    };

    Warranty {
        status,
        expiry_date: Some(expiry_date),
    }
}
