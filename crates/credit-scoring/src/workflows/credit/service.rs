use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::domain::{CreditDecisionResponse, CustomerId, ScoreCreditRequest, ValidationError};
use super::employment::EmploymentClientError;
use super::repository::{
    CreditHistoryRepository, CreditRequestRepository, CustomerRepository,
    EmploymentHistoryClient, RepositoryError,
};
use super::request::{CreditRequest, EvaluatedCreditRequest, EvaluationError};

/// Service composing the customer, employment, credit-history, and persistence collaborators
/// around the scoring core.
pub struct CreditRequestService<C, E, H, P> {
    customers: Arc<C>,
    employment: Arc<E>,
    credit_history: Arc<H>,
    credit_requests: Arc<P>,
    reference_date: Option<NaiveDate>,
}

impl<C, E, H, P> CreditRequestService<C, E, H, P>
where
    C: CustomerRepository + 'static,
    E: EmploymentHistoryClient + 'static,
    H: CreditHistoryRepository + 'static,
    P: CreditRequestRepository + 'static,
{
    pub fn new(
        customers: Arc<C>,
        employment: Arc<E>,
        credit_history: Arc<H>,
        credit_requests: Arc<P>,
    ) -> Self {
        Self {
            customers,
            employment,
            credit_history,
            credit_requests,
            reference_date: None,
        }
    }

    /// Pin the date ages are computed against instead of using today's UTC date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Validate, gather applicant data, evaluate, and persist a scoring command.
    pub async fn decide(
        &self,
        command: ScoreCreditRequest,
    ) -> Result<CreditDecisionResponse, CreditServiceError> {
        let evaluated = self.evaluate(command).await?;

        Ok(CreditDecisionResponse::new(
            evaluated.request().customer_id().clone(),
            evaluated.decision(),
            evaluated.max_credit_amount(),
        ))
    }

    /// Like [`CreditRequestService::decide`] but returns the full evaluated request.
    pub async fn evaluate(
        &self,
        command: ScoreCreditRequest,
    ) -> Result<EvaluatedCreditRequest, CreditServiceError> {
        command.validate()?;
        let ScoreCreditRequest {
            customer_id,
            requested_amount,
        } = command;

        let Some(customer) = self.customers.find(&customer_id).await? else {
            warn!(%customer_id, "no customer found for credit request");
            return Err(CreditServiceError::CustomerNotFound(customer_id));
        };

        let Some(employment) = self.employment.fetch(&customer_id).await? else {
            warn!(%customer_id, "no employment history found for credit request");
            return Err(CreditServiceError::EmploymentHistoryNotFound(customer_id));
        };

        let applicant_age = customer.age_on(self.today());
        let request = CreditRequest::new(customer_id, requested_amount, applicant_age, employment);
        let evaluated = request
            .evaluate(self.credit_history.as_ref(), self.credit_requests.as_ref())
            .await?;

        info!(
            customer_id = %evaluated.request().customer_id(),
            score = evaluated.customer_score(),
            decision = evaluated.decision().label(),
            max_credit_amount = %evaluated.max_credit_amount(),
            "credit request scored"
        );

        Ok(evaluated)
    }
}

/// Error raised by the credit request service.
#[derive(Debug, thiserror::Error)]
pub enum CreditServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("no employment history on file for customer {0}")]
    EmploymentHistoryNotFound(CustomerId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    EmploymentClient(#[from] EmploymentClientError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl CreditServiceError {
    /// True when the request was turned away before the scoring core ran.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            CreditServiceError::Validation(_)
                | CreditServiceError::CustomerNotFound(_)
                | CreditServiceError::EmploymentHistoryNotFound(_)
        )
    }
}
