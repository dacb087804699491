use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decision::{CreditDecision, DecisionEngine};
use super::domain::{CreditHistory, CustomerId, EmploymentProfile};
use super::repository::{
    CreditHistoryRepository, CreditRequestRecord, CreditRequestRepository, RepositoryError,
};
use super::scoring::ScoreEngine;

/// Inputs of a single credit request. Evaluating consumes the request, so every request
/// is scored at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequest {
    customer_id: CustomerId,
    requested_amount: Decimal,
    applicant_age: u32,
    employment: EmploymentProfile,
}

/// Score, decision, and ceiling produced together by one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub customer_score: u8,
    pub decision: CreditDecision,
    pub max_credit_amount: Decimal,
}

impl CreditRequest {
    pub fn new(
        customer_id: CustomerId,
        requested_amount: Decimal,
        applicant_age: u32,
        employment: EmploymentProfile,
    ) -> Self {
        Self {
            customer_id,
            requested_amount,
            applicant_age,
            employment,
        }
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn requested_amount(&self) -> Decimal {
        self.requested_amount
    }

    pub fn applicant_age(&self) -> u32 {
        self.applicant_age
    }

    pub fn employment(&self) -> &EmploymentProfile {
        &self.employment
    }

    /// Pure scoring and decisioning against an already fetched credit history.
    pub fn assess(&self, history: &CreditHistory) -> CreditAssessment {
        let customer_score =
            ScoreEngine::new().calculate(history, &self.employment, self.applicant_age);
        let outcome = DecisionEngine::new().decide(
            customer_score,
            self.requested_amount,
            self.employment.current_net_monthly_income,
        );

        CreditAssessment {
            customer_score,
            decision: outcome.decision,
            max_credit_amount: outcome.max_credit_amount,
        }
    }

    /// Fetch the history, assess, then hand the result to the sink.
    ///
    /// Nothing reaches the sink unless the lookup succeeded and the whole assessment was built.
    pub async fn evaluate<H, P>(
        self,
        history: &H,
        sink: &P,
    ) -> Result<EvaluatedCreditRequest, EvaluationError>
    where
        H: CreditHistoryRepository + ?Sized,
        P: CreditRequestRepository + ?Sized,
    {
        let credit_history = history
            .find(&self.customer_id)
            .await
            .map_err(EvaluationError::HistoryLookup)?;

        let assessment = self.assess(&credit_history);
        let evaluated = EvaluatedCreditRequest {
            request: self,
            credit_history,
            assessment,
        };

        sink.save(&evaluated)
            .await
            .map_err(EvaluationError::Persistence)?;

        Ok(evaluated)
    }
}

/// Immutable result of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedCreditRequest {
    request: CreditRequest,
    credit_history: CreditHistory,
    assessment: CreditAssessment,
}

impl EvaluatedCreditRequest {
    pub fn request(&self) -> &CreditRequest {
        &self.request
    }

    pub fn credit_history(&self) -> &CreditHistory {
        &self.credit_history
    }

    pub fn assessment(&self) -> CreditAssessment {
        self.assessment
    }

    pub fn customer_score(&self) -> u8 {
        self.assessment.customer_score
    }

    pub fn decision(&self) -> CreditDecision {
        self.assessment.decision
    }

    pub fn max_credit_amount(&self) -> Decimal {
        self.assessment.max_credit_amount
    }

    pub fn record(&self) -> CreditRequestRecord {
        CreditRequestRecord {
            customer_id: self.request.customer_id.clone(),
            requested_amount: self.request.requested_amount,
            decision: self.assessment.decision,
            customer_score: self.assessment.customer_score,
            max_credit_amount: self.assessment.max_credit_amount,
        }
    }
}

/// Collaborator failure during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("credit history lookup failed: {0}")]
    HistoryLookup(#[source] RepositoryError),
    #[error("persisting credit request failed: {0}")]
    Persistence(#[source] RepositoryError),
}
