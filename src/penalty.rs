use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::amounts::{Figure, Money};
use crate::dates::parse_optional_calendar_date;

// 0.2% of the contract amount per day late, never more than 5% in total
pub const DAILY_PENALTY_RATE: Figure = dec!(0.002);
pub const PENALTY_RATE_CAP: Figure = dec!(0.05);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatePenalty {
    pub penalty: Money,
    pub days_late: i64,
    pub is_overdue: bool,
    pub net_amount: Money,
    /// Applied rate in percent with one decimal, e.g. "2.0"
    pub penalty_percentage: String,
}

impl LatePenalty {
    fn none(amount: Money) -> LatePenalty {
        LatePenalty {
            penalty: Money::zero(),
            days_late: 0,
            is_overdue: false,
            net_amount: amount,
            penalty_percentage: format_percentage(Decimal::ZERO),
        }
    }
}

/// Penalty accrued on `amount` since `reference_date`, as of `today`.
///
/// A missing or unreadable reference date means no penalty.
pub fn calculate_late_penalty(
    amount: Money,
    reference_date: Option<&str>,
    today: &NaiveDate,
) -> LatePenalty {
    late_penalty_since(amount, parse_optional_calendar_date(reference_date), today)
}

pub fn late_penalty_since(amount: Money, reference_date: Option<NaiveDate>, today: &NaiveDate) -> LatePenalty {
    match reference_date {
        Some(reference_date) => late_penalty_between(amount, &reference_date, today),
        None => LatePenalty::none(amount),
    }
}

pub fn late_penalty_between(amount: Money, reference_date: &NaiveDate, today: &NaiveDate) -> LatePenalty {
    let days_late = (*today - *reference_date).num_days();
    if days_late <= 0 {
        return LatePenalty::none(amount);
    }

    let applied_rate = penalty_rate(days_late);
    let penalty = amount.scale(applied_rate);

    LatePenalty {
        penalty,
        days_late,
        is_overdue: true,
        net_amount: amount - penalty,
        penalty_percentage: format_percentage(applied_rate),
    }
}

pub fn penalty_rate(days_late: i64) -> Figure {
    if days_late <= 0 {
        return Decimal::ZERO;
    }
    // Past the cap there is no need to multiply, which also keeps huge day counts from overflowing
    let days_to_cap = PENALTY_RATE_CAP / DAILY_PENALTY_RATE;
    if Decimal::from(days_late) >= days_to_cap {
        return PENALTY_RATE_CAP;
    }
    (Decimal::from(days_late) * DAILY_PENALTY_RATE).min(PENALTY_RATE_CAP)
}

fn format_percentage(rate: Figure) -> String {
    format!("{:.1}", (rate * dec!(100)).round_dp(1))
}
