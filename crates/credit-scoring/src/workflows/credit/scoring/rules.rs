use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::super::domain::{CreditHistory, EmploymentProfile, EmploymentType};
use super::bands::{lookup, Band};
use super::{ScoreComponent, ScoreFactor};

pub(crate) const YOUNG_APPLICANT_AGE_LIMIT: u32 = 25;
pub(crate) const MISSING_HISTORY_PENALTY: i32 = -5;

pub(crate) const MISSED_PAYMENT_BANDS: &[Band] =
    &[Band::new(0, 0), Band::new(1, -10), Band::new(3, -30)];

// DTI is floored to a whole percentage before lookup, so "above 30" starts at 31.
pub(crate) const DEBT_TO_INCOME_BANDS: &[Band] = &[
    Band::new(i64::MIN, 0),
    Band::new(31, -10),
    Band::new(51, -20),
    Band::new(61, -30),
    Band::new(71, -40),
];

pub(crate) const SELF_EMPLOYED_BANDS: &[Band] =
    &[Band::new(0, 0), Band::new(24, 10), Band::new(60, 15)];
pub(crate) const FULL_TIME_BANDS: &[Band] = &[Band::new(0, 0), Band::new(12, 5), Band::new(36, 10)];
pub(crate) const PART_TIME_BANDS: &[Band] = &[Band::new(0, 0), Band::new(24, 5)];

pub(crate) fn employment_bands(employment_type: EmploymentType) -> &'static [Band] {
    match employment_type {
        EmploymentType::SelfEmployed => SELF_EMPLOYED_BANDS,
        EmploymentType::FullTime => FULL_TIME_BANDS,
        EmploymentType::PartTime => PART_TIME_BANDS,
    }
}

/// Debt as a whole percentage of net income, floored toward negative infinity.
///
/// A non-positive income saturates to the worst bucket instead of dividing by zero.
pub(crate) fn debt_to_income_ratio(existing_debt: Decimal, net_monthly_income: Decimal) -> i64 {
    if net_monthly_income <= Decimal::ZERO {
        return i64::MAX;
    }

    existing_debt
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(net_monthly_income))
        .and_then(|ratio| ratio.floor().to_i64())
        .unwrap_or(i64::MAX)
}

pub(crate) fn score_components(
    history: &CreditHistory,
    employment: &EmploymentProfile,
    applicant_age: u32,
) -> Vec<ScoreComponent> {
    let mut components = Vec::with_capacity(4);

    if !history.is_on_file() && applicant_age < YOUNG_APPLICANT_AGE_LIMIT {
        components.push(ScoreComponent {
            factor: ScoreFactor::MissingHistory,
            adjustment: MISSING_HISTORY_PENALTY,
            notes: format!(
                "no credit history on file for applicant aged {applicant_age} (under {YOUNG_APPLICANT_AGE_LIMIT})"
            ),
        });
    }

    let missed_payments = history.missed_payments();
    components.push(ScoreComponent {
        factor: ScoreFactor::MissedPayments,
        adjustment: lookup(MISSED_PAYMENT_BANDS, i64::from(missed_payments)),
        notes: match history {
            CreditHistory::NotOnFile => "no payment record to assess".to_string(),
            CreditHistory::OnFile(_) => format!("{missed_payments} missed payment(s) on file"),
        },
    });

    let dti = debt_to_income_ratio(
        history.existing_monthly_debt(),
        employment.current_net_monthly_income,
    );
    components.push(ScoreComponent {
        factor: ScoreFactor::DebtToIncome,
        adjustment: lookup(DEBT_TO_INCOME_BANDS, dti),
        notes: format!(
            "debt-to-income {dti}% on net income {}",
            employment.current_net_monthly_income
        ),
    });

    let months = employment.employment_duration_months;
    components.push(ScoreComponent {
        factor: ScoreFactor::EmploymentStability,
        adjustment: lookup(
            employment_bands(employment.employment_type),
            i64::from(months),
        ),
        notes: format!(
            "{} employment for {months} month(s)",
            employment.employment_type.label()
        ),
    });

    components
}
