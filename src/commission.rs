use rust_decimal_macros::dec;

use crate::amounts::{Figure, Money};

pub const COMMISSION_RATE: Figure = dec!(0.30);
const SHARE_WITH_MEDIATOR: Figure = dec!(0.10);
const SHARE_WITHOUT_MEDIATOR: Figure = dec!(0.15);

/// How the 30% commission pool of a deal is divided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommissionSplit {
    pub total_commission: Money,
    pub company_share: Money,
    pub partner_share: Money,
    pub mediator_share: Money,
}

impl CommissionSplit {
    pub fn shares_total(&self) -> Money {
        self.company_share + self.partner_share + self.mediator_share
    }
}

// Negative totals are not rejected, they split proportionally like any other amount
pub fn calculate_commission_split(total_amount: Money, has_mediator: bool) -> CommissionSplit {
    let total_commission = total_amount.scale(COMMISSION_RATE);

    if has_mediator {
        CommissionSplit {
            total_commission,
            company_share: total_amount.scale(SHARE_WITH_MEDIATOR),
            partner_share: total_amount.scale(SHARE_WITH_MEDIATOR),
            mediator_share: total_amount.scale(SHARE_WITH_MEDIATOR),
        }
    } else {
        CommissionSplit {
            total_commission,
            company_share: total_amount.scale(SHARE_WITHOUT_MEDIATOR),
            partner_share: total_amount.scale(SHARE_WITHOUT_MEDIATOR),
            mediator_share: Money::zero(),
        }
    }
}
