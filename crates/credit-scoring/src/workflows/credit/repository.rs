use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decision::CreditDecision;
use super::domain::{CreditHistory, CustomerId, CustomerRecord, EmploymentProfile};
use super::employment::EmploymentClientError;
use super::request::EvaluatedCreditRequest;

/// Customer master data lookup.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerRecord>, RepositoryError>;
}

/// Credit bureau lookup. A customer without a file yields [`CreditHistory::NotOnFile`].
#[async_trait]
pub trait CreditHistoryRepository: Send + Sync {
    async fn find(&self, customer_id: &CustomerId) -> Result<CreditHistory, RepositoryError>;
}

/// Sink for evaluated requests. Called exactly once per evaluation.
#[async_trait]
pub trait CreditRequestRepository: Send + Sync {
    async fn save(&self, evaluated: &EvaluatedCreditRequest) -> Result<(), RepositoryError>;
}

/// Employment-history provider. `Ok(None)` means the provider has nothing for the customer.
#[async_trait]
pub trait EmploymentHistoryClient: Send + Sync {
    async fn fetch(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Row written for every evaluated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequestRecord {
    pub customer_id: CustomerId,
    pub requested_amount: Decimal,
    pub decision: CreditDecision,
    pub customer_score: u8,
    pub max_credit_amount: Decimal,
}
