mod bands;
mod rules;

pub use bands::{lookup, Band};

use serde::{Deserialize, Serialize};

use super::domain::{CreditHistory, EmploymentProfile};

/// Upper bound of the score and the value every evaluation starts from.
pub const MAX_CUSTOMER_SCORE: u8 = 100;

/// Stateless scorer turning credit, debt, and employment signals into a 0-100 score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        history: &CreditHistory,
        employment: &EmploymentProfile,
        applicant_age: u32,
    ) -> u8 {
        self.explain(history, employment, applicant_age).score
    }

    /// Same as [`ScoreEngine::calculate`] but keeps every adjustment for audit trails.
    pub fn explain(
        &self,
        history: &CreditHistory,
        employment: &EmploymentProfile,
        applicant_age: u32,
    ) -> ScoreBreakdown {
        let components = rules::score_components(history, employment, applicant_age);
        let raw = i32::from(MAX_CUSTOMER_SCORE)
            + components
                .iter()
                .map(|component| component.adjustment)
                .sum::<i32>();
        let score = raw.clamp(0, i32::from(MAX_CUSTOMER_SCORE)) as u8;

        ScoreBreakdown { score, components }
    }
}

/// Signal a single adjustment was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFactor {
    MissingHistory,
    MissedPayments,
    DebtToIncome,
    EmploymentStability,
}

/// Discrete contribution to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub adjustment: i32,
    pub notes: String,
}

/// Clamped score plus the adjustments that produced it, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn adjustment_for(&self, factor: ScoreFactor) -> Option<i32> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
            .map(|component| component.adjustment)
    }
}
