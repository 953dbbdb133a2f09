//! Query string parameters and their bounds.

use crate::error::AppError;
use core_types::TransactionType;
use serde::Deserialize;

/// `?limit=` for the all-time matchup listings. Out-of-range values are clamped.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub limit: Option<usize>,
}

impl ListingQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Validates an optional `limit` against an inclusive range.
pub fn bounded_limit(limit: Option<usize>, default: usize, max: usize) -> Result<usize, AppError> {
    match limit {
        None => Ok(default),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(n) => Err(AppError::BadRequest(format!("limit must be between 1 and {max}, got {n}"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub week: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub tx_type: Option<String>,
}

impl TransactionQuery {
    /// The parsed filter; an empty value means no filter.
    pub fn filter(&self) -> Result<Option<TransactionType>, AppError> {
        match self.tx_type.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::BadRequest(format!("tx_type must be one of add, drop, trade, waiver; got '{raw}'"))
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_limit_is_clamped() {
        assert_eq!(ListingQuery { limit: None }.limit(), 20);
        assert_eq!(ListingQuery { limit: Some(500) }.limit(), 100);
        assert_eq!(ListingQuery { limit: Some(0) }.limit(), 1);
    }

    #[test]
    fn bounded_limit_rejects_out_of_range() {
        assert_eq!(bounded_limit(None, 10, 50).unwrap(), 10);
        assert_eq!(bounded_limit(Some(50), 10, 50).unwrap(), 50);
        assert!(bounded_limit(Some(0), 10, 50).is_err());
        assert!(bounded_limit(Some(51), 10, 50).is_err());
    }

    #[test]
    fn transaction_filter_parses_or_rejects() {
        let query = |s: &str| TransactionQuery { tx_type: Some(s.to_string()) };
        assert_eq!(query("trade").filter().unwrap(), Some(TransactionType::Trade));
        assert_eq!(query(" ").filter().unwrap(), None);
        assert_eq!(TransactionQuery::default().filter().unwrap(), None);
        assert!(query("claim").filter().is_err());
    }
}
