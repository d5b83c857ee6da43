use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;

pub const BASE_CURRENCY: &str = "EUR";

/// Rate used when a currency is missing from the snapshot
pub const DEFAULT_RATE: f64 = 1.0;

const SNAPSHOT_DATE_FORMAT: &str = "%d %B %Y";

#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Failed to read rate source: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid snapshot date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid rate for {currency}: {value:?}")]
    InvalidRate { currency: String, value: String },
}

/// Latest currency snapshot: units of each currency for one EUR
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub date: NaiveDate,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    /// Parse a comma-separated snapshot table.
    ///
    /// The first row is the header (`Date, USD, JPY, ...`). Only the last
    /// data row is kept. Returns `Ok(None)` when the source is degenerate:
    /// no data rows, or any row with at most one column.
    pub fn from_reader<R: Read>(source: R) -> Result<Option<Self>, RateError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut header: Option<Vec<String>> = None;
        let mut latest: Option<RateTable> = None;

        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            if record.len() <= 1 {
                return Ok(None);
            }

            match header.as_ref() {
                Some(columns) => latest = Some(Self::from_row(columns, &record)?),
                None => header = Some(record.iter().map(str::to_string).collect()),
            }
        }

        Ok(latest)
    }

    fn from_row(columns: &[String], row: &csv::StringRecord) -> Result<Self, RateError> {
        let raw_date = row.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, SNAPSHOT_DATE_FORMAT)
            .map_err(|_| RateError::InvalidDate(raw_date.to_string()))?;

        let mut rates = HashMap::new();
        for (currency, value) in columns.iter().zip(row.iter()).skip(1) {
            // ECB files end with an empty column and mark suspended rates N/A
            if currency.is_empty() || value.is_empty() || value == "N/A" {
                continue;
            }
            let rate: f64 = value.parse().map_err(|_| RateError::InvalidRate {
                currency: currency.clone(),
                value: value.to_string(),
            })?;
            rates.insert(currency.clone(), rate);
        }

        Ok(Self { date, rates })
    }

    /// Snapshot date as `YYYY-MM-DD`
    pub fn effective_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Rate for a currency, silently falling back to [`DEFAULT_RATE`]
    pub fn rate_for(&self, currency: &str) -> f64 {
        self.rates.get(currency).copied().unwrap_or(DEFAULT_RATE)
    }

    pub fn to_eur(&self, amount: f64, currency: &str) -> f64 {
        convert_to_eur(amount, currency, Some(self))
    }
}

/// Convert an amount to EUR, rounded to cents.
///
/// EUR amounts are returned untouched. Without a table every rate is
/// [`DEFAULT_RATE`].
pub fn convert_to_eur(amount: f64, currency: &str, rates: Option<&RateTable>) -> f64 {
    if currency == BASE_CURRENCY {
        return amount;
    }
    let rate = rates.map_or(DEFAULT_RATE, |table| table.rate_for(currency));
    round_cents(amount / rate)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
