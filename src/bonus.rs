use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use clap::ValueEnum;
#[cfg(test)]
use derive_builder::Builder;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::amounts::{Figure, Money};
use crate::period::Period;

// Flat quality bonus per installed indoor unit
pub const QUALITY_BONUS_PER_INDOOR_UNIT: Figure = dec!(50);

#[cfg_attr(test, derive(Builder), builder(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BonusInputs {
    pub indoor_unit_count: i64,
    pub quality_bonus_enabled: bool,
    pub quantity_bonus_enabled: bool,
    pub monthly_project_count: i64,
}

/// Quantity bonus bracket, keyed by how many projects an entity ran in the month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BonusTier {
    None,
    EightToTwelve,
    TwelveToThirtySix,
    ThirtySixPlus,
}

impl BonusTier {
    pub fn for_count(monthly_project_count: i64) -> BonusTier {
        match monthly_project_count {
            count if count >= 36 => BonusTier::ThirtySixPlus,
            count if count >= 12 => BonusTier::TwelveToThirtySix,
            count if count >= 8 => BonusTier::EightToTwelve,
            _ => BonusTier::None,
        }
    }

    pub fn bonus(&self) -> Money {
        Money::new(match self {
            BonusTier::ThirtySixPlus => dec!(200),
            BonusTier::TwelveToThirtySix => dec!(100),
            BonusTier::EightToTwelve => dec!(50),
            BonusTier::None => Decimal::ZERO,
        })
    }
}

impl Display for BonusTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BonusTier::ThirtySixPlus => "36+",
            BonusTier::TwelveToThirtySix => "12-36",
            BonusTier::EightToTwelve => "08-12",
            BonusTier::None => "None",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bonus {
    pub quality_bonus: Money,
    pub quantity_bonus: Money,
    /// Reported even when the quantity bonus is switched off
    pub tier: BonusTier,
    pub total_bonus: Money,
}

pub fn calculate_bonus(inputs: &BonusInputs) -> Bonus {
    let quality_bonus = if inputs.quality_bonus_enabled {
        Money::new(Decimal::from(inputs.indoor_unit_count) * QUALITY_BONUS_PER_INDOOR_UNIT)
    } else {
        Money::zero()
    };

    let tier = BonusTier::for_count(inputs.monthly_project_count);
    let quantity_bonus = if inputs.quantity_bonus_enabled {
        tier.bonus()
    } else {
        Money::zero()
    };

    Bonus {
        quality_bonus,
        quantity_bonus,
        tier,
        total_bonus: quality_bonus + quantity_bonus,
    }
}

/// Who a project's monthly volume is counted against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponsibleEntity {
    #[default]
    Subcontractor,
    Partner,
    Contractor,
}

pub trait MonthlyCountable {
    fn id(&self) -> &str;
    fn responsible(&self, entity: ResponsibleEntity) -> Option<&str>;
    fn bonus_reference_date(&self) -> Option<NaiveDate>;
}

/// Number of other projects run by the same entity in the calendar month of `evaluated`.
///
/// Entities match by exact name. Projects without a reference date or without a responsible
/// entity never count, and neither does `evaluated` itself.
pub fn monthly_project_count<'a, P, I>(projects: I, evaluated: &P, entity: ResponsibleEntity) -> i64
where
    P: MonthlyCountable + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let (Some(name), Some(reference_date)) =
        (evaluated.responsible(entity), evaluated.bonus_reference_date())
    else {
        return 0;
    };
    let Ok(month) = Period::calendar_month(&reference_date) else {
        return 0;
    };

    projects
        .into_iter()
        .filter(|project| project.id() != evaluated.id())
        .filter(|project| project.responsible(entity) == Some(name))
        .filter(|project| {
            project
                .bonus_reference_date()
                .map(|date| month.contains(&date))
                .unwrap_or(false)
        })
        .count() as i64
}

#[allow(non_snake_case)]
#[cfg(test)]
mod calculate_bonus_tests {
    use super::{calculate_bonus, Bonus, BonusInputsBuilder, BonusTier};
    use crate::amounts::Money;
    use pretty_assertions::assert_eq;

    fn tier_for(count: i64) -> String {
        BonusTier::for_count(count).to_string()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for(0), "None");
        assert_eq!(tier_for(7), "None");
        assert_eq!(tier_for(8), "08-12");
        assert_eq!(tier_for(11), "08-12");
        assert_eq!(tier_for(12), "12-36");
        assert_eq!(tier_for(35), "12-36");
        assert_eq!(tier_for(36), "36+");
        assert_eq!(tier_for(120), "36+");
        assert_eq!(tier_for(-4), "None");
    }

    #[test]
    fn both_bonuses() {
        let inputs = BonusInputsBuilder::default()
            .indoor_unit_count(4)
            .quality_bonus_enabled(true)
            .quantity_bonus_enabled(true)
            .monthly_project_count(15)
            .build()
            .unwrap();

        assert_eq!(
            calculate_bonus(&inputs),
            Bonus {
                quality_bonus: Money::euro("200"),
                quantity_bonus: Money::euro("100"),
                tier: BonusTier::TwelveToThirtySix,
                total_bonus: Money::euro("300"),
            }
        );
    }

    #[test]
    fn quantity_disabled__tier_still_reported() {
        let inputs = BonusInputsBuilder::default()
            .indoor_unit_count(3)
            .quality_bonus_enabled(true)
            .monthly_project_count(40)
            .build()
            .unwrap();

        let bonus = calculate_bonus(&inputs);
        assert_eq!(bonus.tier, BonusTier::ThirtySixPlus);
        assert_eq!(bonus.quantity_bonus, Money::zero());
        assert_eq!(bonus.total_bonus, Money::euro("150"));
    }

    #[test]
    fn quality_disabled() {
        let inputs = BonusInputsBuilder::default()
            .indoor_unit_count(10)
            .quantity_bonus_enabled(true)
            .monthly_project_count(8)
            .build()
            .unwrap();

        let bonus = calculate_bonus(&inputs);
        assert_eq!(bonus.quality_bonus, Money::zero());
        assert_eq!(bonus.quantity_bonus, Money::euro("50"));
        assert_eq!(bonus.total_bonus, Money::euro("50"));
    }

    #[test]
    fn nothing_enabled() {
        let inputs = BonusInputsBuilder::default()
            .indoor_unit_count(10)
            .monthly_project_count(50)
            .build()
            .unwrap();

        assert_eq!(calculate_bonus(&inputs).total_bonus, Money::zero());
    }

    #[test]
    fn negative_indoor_units__propagate() {
        let inputs = BonusInputsBuilder::default()
            .indoor_unit_count(-2)
            .quality_bonus_enabled(true)
            .build()
            .unwrap();

        assert_eq!(calculate_bonus(&inputs).quality_bonus, Money::euro("-100"));
    }
}
