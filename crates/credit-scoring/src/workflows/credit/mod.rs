//! Credit request scoring and decisioning.
//!
//! `scoring` and `decision` are pure and hold no state. `request` composes them with the
//! credit-history lookup and the persistence sink. `service` and `router` add validation,
//! applicant lookups, and the HTTP surface around that core.

pub mod batch;
pub mod decision;
pub mod domain;
pub mod employment;
pub mod repository;
pub mod request;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{BatchImportError, BatchRequestReader};
pub use decision::{
    CreditDecision, DecisionEngine, DecisionOutcome, MANUAL_REVIEW_SCORES, MINIMUM_APPROVAL_SCORE,
};
pub use domain::{
    CreditDecisionResponse, CreditHistory, CreditHistoryRecord, CustomerId, CustomerRecord,
    EmploymentProfile, EmploymentType, ScoreCreditRequest, UnknownEmploymentType,
    ValidationError, CUSTOMER_ID_LENGTH,
};
pub use employment::{
    EmploymentClientError, EmploymentHistoryResponse, HttpEmploymentHistoryClient,
};
pub use repository::{
    CreditHistoryRepository, CreditRequestRecord, CreditRequestRepository, CustomerRepository,
    EmploymentHistoryClient, RepositoryError,
};
pub use request::{CreditAssessment, CreditRequest, EvaluatedCreditRequest, EvaluationError};
pub use router::{credit_router, CREDITS_PATH};
pub use scoring::{ScoreBreakdown, ScoreComponent, ScoreEngine, ScoreFactor, MAX_CUSTOMER_SCORE};
pub use service::{CreditRequestService, CreditServiceError};
