use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::domain::ScoreCreditRequest;

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidAmount { line: u64, value: String },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read batch file: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid batch CSV data: {}", err),
            BatchImportError::InvalidAmount { line, value } => write!(
                f,
                "line {}: requested amount '{}' is not a decimal number",
                line, value
            ),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::InvalidAmount { .. } => None,
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads scoring commands from CSV with a `customer_id,requested_amount` header.
pub struct BatchRequestReader;

impl BatchRequestReader {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ScoreCreditRequest>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ScoreCreditRequest>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut requests = Vec::new();

        // Line 1 is the header.
        for (line, record) in (2u64..).zip(csv_reader.deserialize::<BatchRow>()) {
            let row = record?;
            let requested_amount = Decimal::from_str(&row.requested_amount).map_err(|_| {
                BatchImportError::InvalidAmount {
                    line,
                    value: row.requested_amount.clone(),
                }
            })?;

            requests.push(ScoreCreditRequest::new(row.customer_id, requested_amount));
        }

        Ok(requests)
    }
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    customer_id: String,
    requested_amount: String,
}
