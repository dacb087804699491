use async_trait::async_trait;
use chrono::NaiveDate;
use credit_scoring::config::EmploymentHistoryConfig;
use credit_scoring::error::AppError;
use credit_scoring::workflows::credit::{
    CreditHistory, CreditHistoryRepository, CreditRequestRecord, CreditRequestRepository,
    CreditRequestService, CustomerId, CustomerRecord, CustomerRepository, EmploymentClientError,
    EmploymentHistoryClient, EmploymentProfile, EmploymentType, EvaluatedCreditRequest,
    HttpEmploymentHistoryClient, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct SeedCustomer {
    customer_id: &'static str,
    date_of_birth: (i32, u32, u32),
    first_name: &'static str,
    middle_name: Option<&'static str>,
    last_name: &'static str,
    employment_type: EmploymentType,
    employment_months: u32,
    net_monthly_income: i64,
    missed_payments: u32,
}

// Seeded histories carry no monthly debt.
const SEED_CUSTOMERS: [SeedCustomer; 4] = [
    SeedCustomer {
        customer_id: "0141260470",
        date_of_birth: (2001, 1, 26),
        first_name: "Maja",
        middle_name: Some("Elise"),
        last_name: "Brandt",
        employment_type: EmploymentType::PartTime,
        employment_months: 8,
        net_monthly_income: 1500,
        missed_payments: 0,
    },
    SeedCustomer {
        customer_id: "9001013400",
        date_of_birth: (1990, 1, 28),
        first_name: "Jonas",
        middle_name: None,
        last_name: "Holm",
        employment_type: EmploymentType::FullTime,
        employment_months: 60,
        net_monthly_income: 5000,
        missed_payments: 2,
    },
    SeedCustomer {
        customer_id: "8403162283",
        date_of_birth: (1984, 3, 16),
        first_name: "Nadia",
        middle_name: Some("Ruth"),
        last_name: "Okonkwo",
        employment_type: EmploymentType::SelfEmployed,
        employment_months: 24,
        net_monthly_income: 4000,
        missed_payments: 1,
    },
    SeedCustomer {
        customer_id: "7506027756",
        date_of_birth: (1975, 6, 2),
        first_name: "Tomas",
        middle_name: None,
        last_name: "Lind",
        employment_type: EmploymentType::FullTime,
        employment_months: 20,
        net_monthly_income: 1200,
        missed_payments: 0,
    },
];

#[derive(Default, Clone)]
pub(crate) struct InMemoryCustomerRepository {
    records: Arc<HashMap<CustomerId, CustomerRecord>>,
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<CustomerRecord>, RepositoryError> {
        Ok(self.records.get(customer_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCreditHistoryRepository {
    histories: Arc<HashMap<CustomerId, CreditHistory>>,
}

#[async_trait]
impl CreditHistoryRepository for InMemoryCreditHistoryRepository {
    async fn find(&self, customer_id: &CustomerId) -> Result<CreditHistory, RepositoryError> {
        Ok(self
            .histories
            .get(customer_id)
            .cloned()
            .unwrap_or(CreditHistory::NotOnFile))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEmploymentHistory {
    profiles: Arc<HashMap<CustomerId, EmploymentProfile>>,
}

#[async_trait]
impl EmploymentHistoryClient for InMemoryEmploymentHistory {
    async fn fetch(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError> {
        Ok(self.profiles.get(customer_id).cloned())
    }
}

/// Append-only decision log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCreditRequestRepository {
    records: Arc<Mutex<Vec<CreditRequestRecord>>>,
}

impl InMemoryCreditRequestRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<CreditRequestRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("decision log poisoned".to_string()))
    }

    pub(crate) fn records(&self) -> Result<Vec<CreditRequestRecord>, RepositoryError> {
        Ok(self.lock()?.clone())
    }
}

#[async_trait]
impl CreditRequestRepository for InMemoryCreditRequestRepository {
    async fn save(&self, evaluated: &EvaluatedCreditRequest) -> Result<(), RepositoryError> {
        self.lock()?.push(evaluated.record());
        Ok(())
    }
}

/// Employment data comes from the configured HTTP provider, or from the seeded store when no
/// provider URL is set.
#[derive(Clone)]
pub(crate) enum EmploymentSource {
    Http(HttpEmploymentHistoryClient),
    Seeded(InMemoryEmploymentHistory),
}

impl EmploymentSource {
    pub(crate) fn from_config(
        config: &EmploymentHistoryConfig,
        seeded: InMemoryEmploymentHistory,
    ) -> Result<Self, EmploymentClientError> {
        match &config.base_url {
            Some(base_url) => Ok(EmploymentSource::Http(HttpEmploymentHistoryClient::new(
                base_url.clone(),
                config.timeout,
            )?)),
            None => Ok(EmploymentSource::Seeded(seeded)),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            EmploymentSource::Http(_) => "http",
            EmploymentSource::Seeded(_) => "seeded",
        }
    }

    pub(crate) fn endpoint(&self) -> Option<&str> {
        match self {
            EmploymentSource::Http(client) => Some(client.base_url()),
            EmploymentSource::Seeded(_) => None,
        }
    }
}

#[async_trait]
impl EmploymentHistoryClient for EmploymentSource {
    async fn fetch(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError> {
        match self {
            EmploymentSource::Http(client) => client.fetch(customer_id).await,
            EmploymentSource::Seeded(store) => store.fetch(customer_id).await,
        }
    }
}

pub(crate) type AppCreditService = CreditRequestService<
    InMemoryCustomerRepository,
    EmploymentSource,
    InMemoryCreditHistoryRepository,
    InMemoryCreditRequestRepository,
>;

/// Service plus the decision log and employment source backing it.
pub(crate) struct CreditStack {
    pub(crate) service: Arc<AppCreditService>,
    pub(crate) decisions: Arc<InMemoryCreditRequestRepository>,
    pub(crate) employment: EmploymentSource,
}

struct SeededStores {
    customers: InMemoryCustomerRepository,
    histories: InMemoryCreditHistoryRepository,
    employment: InMemoryEmploymentHistory,
}

fn seeded_stores() -> SeededStores {
    let mut customers = HashMap::new();
    let mut histories = HashMap::new();
    let mut profiles = HashMap::new();

    for seed in &SEED_CUSTOMERS {
        let (year, month, day) = seed.date_of_birth;
        let Some(date_of_birth) = NaiveDate::from_ymd_opt(year, month, day) else {
            warn!(customer_id = seed.customer_id, "skipping seed with invalid birth date");
            continue;
        };
        let customer_id = CustomerId::new(seed.customer_id);

        customers.insert(
            customer_id.clone(),
            CustomerRecord {
                customer_id: customer_id.clone(),
                date_of_birth,
                first_name: seed.first_name.to_string(),
                middle_name: seed.middle_name.map(str::to_string),
                last_name: seed.last_name.to_string(),
            },
        );
        histories.insert(
            customer_id.clone(),
            CreditHistory::on_file(seed.missed_payments, Decimal::ZERO),
        );
        profiles.insert(
            customer_id,
            EmploymentProfile {
                employment_type: seed.employment_type,
                employment_duration_months: seed.employment_months,
                current_net_monthly_income: Decimal::from(seed.net_monthly_income),
            },
        );
    }

    SeededStores {
        customers: InMemoryCustomerRepository {
            records: Arc::new(customers),
        },
        histories: InMemoryCreditHistoryRepository {
            histories: Arc::new(histories),
        },
        employment: InMemoryEmploymentHistory {
            profiles: Arc::new(profiles),
        },
    }
}

/// Wire the credit service against the seeded stores. `reference_date` pins the age
/// calculation; `None` uses today's date.
pub(crate) fn build_credit_stack(
    config: &EmploymentHistoryConfig,
    reference_date: Option<NaiveDate>,
) -> Result<CreditStack, AppError> {
    let stores = seeded_stores();
    let employment = EmploymentSource::from_config(config, stores.employment)?;

    let decisions = Arc::new(InMemoryCreditRequestRepository::default());
    let mut service = CreditRequestService::new(
        Arc::new(stores.customers),
        Arc::new(employment.clone()),
        Arc::new(stores.histories),
        decisions.clone(),
    );
    if let Some(date) = reference_date {
        service = service.with_reference_date(date);
    }

    Ok(CreditStack {
        service: Arc::new(service),
        decisions,
        employment,
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_scoring::workflows::credit::{CreditDecision, ScoreCreditRequest};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn seeded_config() -> EmploymentHistoryConfig {
        EmploymentHistoryConfig {
            base_url: None,
            timeout: Duration::from_secs(1),
        }
    }

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    #[tokio::test]
    async fn seeded_stack_scores_all_seed_customers() {
        let stack = build_credit_stack(&seeded_config(), Some(reference_date()))
            .expect("stack builds");

        for seed in &SEED_CUSTOMERS {
            let evaluated = stack
                .service
                .evaluate(ScoreCreditRequest::new(seed.customer_id, dec!(1000)))
                .await
                .expect("seed customer scores");
            assert_eq!(evaluated.customer_score(), 100, "{}", seed.customer_id);
            assert_eq!(evaluated.decision(), CreditDecision::Approved);
        }

        assert_eq!(stack.decisions.records().expect("records").len(), 4);
    }

    #[tokio::test]
    async fn young_part_timer_ceiling_follows_income() {
        let stack = build_credit_stack(&seeded_config(), Some(reference_date()))
            .expect("stack builds");

        let response = stack
            .service
            .decide(ScoreCreditRequest::new("0141260470", dec!(40000)))
            .await
            .expect("decision succeeds");

        assert_eq!(response.decision, "Rejected");
        assert_eq!(response.max_credit_amount, dec!(30000));
    }

    #[test]
    fn configured_url_selects_http_provider() {
        let config = EmploymentHistoryConfig {
            base_url: Some("http://localhost:5080/".to_string()),
            timeout: Duration::from_secs(1),
        };

        let source = EmploymentSource::from_config(&config, seeded_stores().employment)
            .expect("client builds");
        assert_eq!(source.label(), "http");
        assert_eq!(source.endpoint(), Some("http://localhost:5080"));

        let source = EmploymentSource::from_config(&seeded_config(), seeded_stores().employment)
            .expect("seeded source");
        assert_eq!(source.label(), "seeded");
        assert_eq!(source.endpoint(), None);
    }

    #[test]
    fn stack_exposes_selected_employment_source() {
        let stack = build_credit_stack(&seeded_config(), Some(reference_date()))
            .expect("stack builds");

        assert_eq!(stack.employment.label(), "seeded");
        assert_eq!(stack.employment.endpoint(), None);
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-06-01 ").expect("valid date"),
            reference_date()
        );
        assert!(parse_date("June 1st").is_err());
    }
}
