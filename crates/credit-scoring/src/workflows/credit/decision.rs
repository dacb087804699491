use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::scoring::{lookup, Band};

/// Scores below this are rejected outright with a zero ceiling.
pub const MINIMUM_APPROVAL_SCORE: u8 = 50;

/// Scores that qualify but still need a human to sign off.
pub const MANUAL_REVIEW_SCORES: RangeInclusive<u8> = 50..=60;

// Multiplier on net monthly income by score band. At exactly 60 the ceiling is already x5
// while the score is still inside the review band.
const CEILING_MULTIPLIER_BANDS: &[Band] = &[
    Band::new(50, 3),
    Band::new(60, 5),
    Band::new(70, 10),
    Band::new(80, 20),
];

/// Outcome of a credit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditDecision {
    Approved,
    Rejected,
    ManualReviewRequired,
}

impl CreditDecision {
    /// Label shown to API and CLI callers.
    pub const fn label(self) -> &'static str {
        match self {
            CreditDecision::Approved => "Approved",
            CreditDecision::Rejected => "Rejected",
            CreditDecision::ManualReviewRequired => "For manual review",
        }
    }
}

/// Decision plus the credit ceiling it was taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision: CreditDecision,
    pub max_credit_amount: Decimal,
}

/// Maps a score, the requested amount, and income to a decision and a credit ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(
        &self,
        score: u8,
        requested_amount: Decimal,
        net_monthly_income: Decimal,
    ) -> DecisionOutcome {
        if score < MINIMUM_APPROVAL_SCORE {
            return DecisionOutcome {
                decision: CreditDecision::Rejected,
                max_credit_amount: Decimal::ZERO,
            };
        }

        let max_credit_amount = self.max_credit_amount(score, net_monthly_income);

        // Over-asks are rejected but still learn the ceiling they could re-apply for.
        let decision = if requested_amount > max_credit_amount {
            CreditDecision::Rejected
        } else if MANUAL_REVIEW_SCORES.contains(&score) {
            CreditDecision::ManualReviewRequired
        } else {
            CreditDecision::Approved
        };

        DecisionOutcome {
            decision,
            max_credit_amount,
        }
    }

    /// Ceiling for a score; zero below the approval threshold.
    pub fn max_credit_amount(&self, score: u8, net_monthly_income: Decimal) -> Decimal {
        let multiplier = lookup(CEILING_MULTIPLIER_BANDS, i64::from(score));
        net_monthly_income
            .checked_mul(Decimal::from(multiplier))
            .unwrap_or(Decimal::MAX)
    }
}
