use crate::infra::{build_credit_stack, parse_date, CreditStack};
use chrono::NaiveDate;
use clap::Args;
use credit_scoring::config::AppConfig;
use credit_scoring::error::AppError;
use credit_scoring::workflows::credit::{
    BatchRequestReader, CreditDecisionResponse, CreditServiceError, ScoreCreditRequest,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Ten-character customer identifier
    #[arg(long)]
    pub(crate) customer_id: String,
    /// Requested credit amount
    #[arg(long)]
    pub(crate) amount: Decimal,
    /// Date ages are computed against (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with a `customer_id,requested_amount` header
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Date ages are computed against (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// One line of batch output: the decision, or why the row could not be scored.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum BatchLine {
    Decided(CreditDecisionResponse),
    Failed {
        #[serde(rename = "customerId")]
        customer_id: String,
        error: String,
    },
}

impl BatchLine {
    fn from_outcome(
        customer_id: String,
        outcome: Result<CreditDecisionResponse, CreditServiceError>,
    ) -> Self {
        match outcome {
            Ok(response) => BatchLine::Decided(response),
            Err(err) => BatchLine::Failed {
                customer_id,
                error: err.to_string(),
            },
        }
    }
}

fn load_stack(today: Option<NaiveDate>) -> Result<CreditStack, AppError> {
    let config = AppConfig::load()?;
    build_credit_stack(&config.employment_history, today)
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        customer_id,
        amount,
        today,
    } = args;

    let stack = load_stack(today)?;
    let response = stack
        .service
        .decide(ScoreCreditRequest::new(customer_id, amount))
        .await?;

    print_json(&response);
    Ok(())
}

pub(crate) async fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let commands = BatchRequestReader::from_path(&args.input)?;
    let stack = load_stack(args.today)?;

    for line in score_batch(&stack, commands).await {
        print_json(&line);
    }

    let stored = stack.decisions.records().map(|records| records.len()).unwrap_or(0);
    tracing::info!(input = %args.input.display(), stored, "batch scored");
    Ok(())
}

pub(crate) async fn score_batch(
    stack: &CreditStack,
    commands: Vec<ScoreCreditRequest>,
) -> Vec<BatchLine> {
    let mut lines = Vec::with_capacity(commands.len());
    for command in commands {
        let customer_id = command.customer_id.as_str().to_string();
        let outcome = stack.service.decide(command).await;
        lines.push(BatchLine::from_outcome(customer_id, outcome));
    }
    lines
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to render output: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_scoring::config::EmploymentHistoryConfig;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::time::Duration;

    fn seeded_stack() -> CreditStack {
        let config = EmploymentHistoryConfig {
            base_url: None,
            timeout: Duration::from_secs(1),
        };
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        build_credit_stack(&config, Some(today)).expect("stack builds")
    }

    #[tokio::test]
    async fn batch_keeps_going_past_failed_rows() {
        let stack = seeded_stack();
        let commands = vec![
            ScoreCreditRequest::new("9001013400", dec!(60000)),
            ScoreCreditRequest::new("short", dec!(100)),
            ScoreCreditRequest::new("5555555555", dec!(100)),
            ScoreCreditRequest::new("7506027756", dec!(30000)),
        ];

        let lines = score_batch(&stack, commands).await;
        let rendered: Vec<serde_json::Value> = lines
            .iter()
            .map(|line| serde_json::to_value(line).expect("serializes"))
            .collect();

        assert_eq!(
            rendered[0],
            json!({
                "customerId": "9001013400",
                "decision": "Approved",
                "maxCreditAmount": 100000.0,
            })
        );
        assert_eq!(
            rendered[1],
            json!({
                "customerId": "short",
                "error": "customer id must be 10 characters, got 5",
            })
        );
        assert_eq!(
            rendered[2],
            json!({
                "customerId": "5555555555",
                "error": "customer 5555555555 not found",
            })
        );
        assert_eq!(rendered[3]["decision"], "Rejected");
        assert_eq!(stack.decisions.records().expect("records").len(), 2);
    }
}
