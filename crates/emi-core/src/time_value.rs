use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::EmiError;
use crate::types::{Money, Rate};
use crate::EmiResult;

/// Currency-cent granularity used for every monetary field.
pub const MONEY_DP: u32 = 2;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Round to cents, half away from zero.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an annual percentage rate (10 = 10%) to a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Rate) -> Rate {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// Level payment that amortizes `principal` over `nper` periods at `rate` per period.
///
/// Unrounded. A zero rate degenerates to straight-line repayment.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> EmiResult<Money> {
    if nper == 0 {
        return Err(EmiError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| EmiError::NumericOverflow {
            context: format!("compounding factor (1 + {rate})^{nper}"),
        })?;

    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(EmiError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| EmiError::NumericOverflow {
            context: "annuity payment".into(),
        })
}

/// Whole months in a term given in years. Fractional months are truncated.
pub fn term_months_from_years(years: Decimal) -> EmiResult<u32> {
    if years < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "term_years".into(),
            reason: "Term cannot be negative".into(),
        });
    }

    let months = (years * MONTHS_PER_YEAR)
        .floor()
        .to_u32()
        .ok_or_else(|| EmiError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term of {years} years is out of range"),
        })?;

    if months == 0 {
        return Err(EmiError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must cover at least one whole month".into(),
        });
    }
    Ok(months)
}
