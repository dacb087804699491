use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::credit::domain::{
    CreditHistory, CustomerId, CustomerRecord, EmploymentProfile, EmploymentType,
    UnknownEmploymentType,
};
use crate::workflows::credit::employment::EmploymentClientError;
use crate::workflows::credit::repository::{
    CreditHistoryRepository, CreditRequestRecord, CreditRequestRepository, CustomerRepository,
    EmploymentHistoryClient, RepositoryError,
};
use crate::workflows::credit::request::EvaluatedCreditRequest;
use crate::workflows::credit::service::CreditRequestService;

pub(super) const CUSTOMER_ID: &str = "9001013400";

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid reference date")
}

pub(super) fn employment(
    employment_type: EmploymentType,
    months: u32,
    income: Decimal,
) -> EmploymentProfile {
    EmploymentProfile {
        employment_type,
        employment_duration_months: months,
        current_net_monthly_income: income,
    }
}

pub(super) fn customer(customer_id: &str, date_of_birth: NaiveDate) -> CustomerRecord {
    CustomerRecord {
        customer_id: CustomerId::new(customer_id),
        date_of_birth,
        first_name: "Dana".to_string(),
        middle_name: None,
        last_name: "Okafor".to_string(),
    }
}

/// Customer aged 30 on [`reference_date`].
pub(super) fn thirty_year_old(customer_id: &str) -> CustomerRecord {
    customer(
        customer_id,
        NaiveDate::from_ymd_opt(1995, 1, 15).expect("valid birth date"),
    )
}

/// Customer aged 23 on [`reference_date`].
pub(super) fn twenty_three_year_old(customer_id: &str) -> CustomerRecord {
    customer(
        customer_id,
        NaiveDate::from_ymd_opt(2001, 11, 26).expect("valid birth date"),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryCustomers {
    records: Arc<Mutex<HashMap<CustomerId, CustomerRecord>>>,
}

impl MemoryCustomers {
    pub(super) fn with(records: Vec<CustomerRecord>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("customer mutex poisoned");
            for record in records {
                guard.insert(record.customer_id.clone(), record);
            }
        }
        store
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomers {
    async fn find(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerRecord>, RepositoryError> {
        let guard = self.records.lock().expect("customer mutex poisoned");
        Ok(guard.get(customer_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEmployment {
    profiles: Arc<Mutex<HashMap<CustomerId, EmploymentProfile>>>,
}

impl MemoryEmployment {
    pub(super) fn with(customer_id: &str, profile: EmploymentProfile) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .expect("employment mutex poisoned")
            .insert(CustomerId::new(customer_id), profile);
        store
    }
}

#[async_trait]
impl EmploymentHistoryClient for MemoryEmployment {
    async fn fetch(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError> {
        let guard = self.profiles.lock().expect("employment mutex poisoned");
        Ok(guard.get(customer_id).cloned())
    }
}

/// Provider that answers with an employment code outside the contract.
pub(super) struct UnknownTypeEmployment;

#[async_trait]
impl EmploymentHistoryClient for UnknownTypeEmployment {
    async fn fetch(
        &self,
        _customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError> {
        Err(UnknownEmploymentType(9).into())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHistory {
    histories: Arc<Mutex<HashMap<CustomerId, CreditHistory>>>,
    lookups: Arc<Mutex<usize>>,
}

impl MemoryHistory {
    pub(super) fn with(customer_id: &str, history: CreditHistory) -> Self {
        let store = Self::default();
        store
            .histories
            .lock()
            .expect("history mutex poisoned")
            .insert(CustomerId::new(customer_id), history);
        store
    }

    pub(super) fn lookups(&self) -> usize {
        *self.lookups.lock().expect("history mutex poisoned")
    }
}

#[async_trait]
impl CreditHistoryRepository for MemoryHistory {
    async fn find(&self, customer_id: &CustomerId) -> Result<CreditHistory, RepositoryError> {
        *self.lookups.lock().expect("history mutex poisoned") += 1;
        let guard = self.histories.lock().expect("history mutex poisoned");
        Ok(guard
            .get(customer_id)
            .cloned()
            .unwrap_or(CreditHistory::NotOnFile))
    }
}

pub(super) struct OfflineHistory;

#[async_trait]
impl CreditHistoryRepository for OfflineHistory {
    async fn find(&self, _customer_id: &CustomerId) -> Result<CreditHistory, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDecisions {
    records: Arc<Mutex<Vec<CreditRequestRecord>>>,
}

impl MemoryDecisions {
    pub(super) fn records(&self) -> Vec<CreditRequestRecord> {
        self.records.lock().expect("decision mutex poisoned").clone()
    }
}

#[async_trait]
impl CreditRequestRepository for MemoryDecisions {
    async fn save(&self, evaluated: &EvaluatedCreditRequest) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("decision mutex poisoned")
            .push(evaluated.record());
        Ok(())
    }
}

pub(super) struct OfflineDecisions;

#[async_trait]
impl CreditRequestRepository for OfflineDecisions {
    async fn save(&self, _evaluated: &EvaluatedCreditRequest) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService =
    CreditRequestService<MemoryCustomers, MemoryEmployment, MemoryHistory, MemoryDecisions>;

/// Service for a thirty-year-old full-timer: 60 months, 5000 income, clean history, 500 debt.
pub(super) fn build_service() -> (MemoryService, Arc<MemoryHistory>, Arc<MemoryDecisions>) {
    build_service_with(
        thirty_year_old(CUSTOMER_ID),
        employment(EmploymentType::FullTime, 60, dec!(5000)),
        CreditHistory::on_file(0, dec!(500)),
    )
}

pub(super) fn build_service_with(
    customer: CustomerRecord,
    profile: EmploymentProfile,
    history: CreditHistory,
) -> (MemoryService, Arc<MemoryHistory>, Arc<MemoryDecisions>) {
    let customer_id = customer.customer_id.as_str().to_string();
    let customers = Arc::new(MemoryCustomers::with(vec![customer]));
    let employment = Arc::new(MemoryEmployment::with(&customer_id, profile));
    let histories = Arc::new(MemoryHistory::with(&customer_id, history));
    let decisions = Arc::new(MemoryDecisions::default());

    let service = CreditRequestService::new(
        customers,
        employment,
        histories.clone(),
        decisions.clone(),
    )
    .with_reference_date(reference_date());

    (service, histories, decisions)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_bad_request(response: &Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
