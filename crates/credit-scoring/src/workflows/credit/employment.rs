use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{CustomerId, EmploymentProfile, EmploymentType, UnknownEmploymentType};
use super::repository::EmploymentHistoryClient;

/// Wire format returned by the employment-history provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentHistoryResponse {
    #[serde(default)]
    pub customer_id: Option<String>,
    pub employment_type: i64,
    pub employment_duration_in_months: u32,
    pub current_net_monthly_income: Decimal,
}

impl TryFrom<EmploymentHistoryResponse> for EmploymentProfile {
    type Error = UnknownEmploymentType;

    fn try_from(response: EmploymentHistoryResponse) -> Result<Self, Self::Error> {
        Ok(EmploymentProfile {
            employment_type: EmploymentType::try_from(response.employment_type)?,
            employment_duration_months: response.employment_duration_in_months,
            current_net_monthly_income: response.current_net_monthly_income,
        })
    }
}

/// Failures talking to the employment-history provider.
#[derive(Debug, thiserror::Error)]
pub enum EmploymentClientError {
    #[error("failed to build employment history client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("employment history request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("employment history provider returned {0}")]
    UnexpectedStatus(u16),
    #[error("employment history payload could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    UnknownEmploymentType(#[from] UnknownEmploymentType),
}

/// Client for the employment-history HTTP provider.
#[derive(Clone)]
pub struct HttpEmploymentHistoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEmploymentHistoryClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmploymentClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EmploymentClientError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn history_url(&self, customer_id: &CustomerId) -> String {
        format!("{}/api/employmentHistory/{}", self.base_url, customer_id)
    }
}

#[async_trait]
impl EmploymentHistoryClient for HttpEmploymentHistoryClient {
    async fn fetch(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<EmploymentProfile>, EmploymentClientError> {
        let url = self.history_url(customer_id);
        tracing::debug!(%customer_id, %url, "fetching employment history");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(EmploymentClientError::Transport)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(EmploymentClientError::UnexpectedStatus(status.as_u16()))
            }
            _ => {}
        }

        let payload = response
            .json::<EmploymentHistoryResponse>()
            .await
            .map_err(EmploymentClientError::Decode)?;

        let profile = EmploymentProfile::try_from(payload).map_err(|err| {
            tracing::error!(%customer_id, code = err.0, "provider sent unknown employment type");
            err
        })?;

        Ok(Some(profile))
    }
}
