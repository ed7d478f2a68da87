//! Boundary validation of raw ledger records
//!
//! Both the CSV and the JSON readers deserialize into loosely typed
//! [`RawRecord`]s and funnel them through [`convert_record`], so the two
//! input formats accept and reject exactly the same records.

use crate::types::{
    LedgerError, PaymentMethod, TransactionRecord, TransactionStatus, TransactionType,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Ledger row before validation
///
/// Every field is optional text; deciding what is acceptable is
/// `convert_record`'s job, not the deserializer's.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", alias = "tx_type", default)]
    pub tx_type: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(alias = "paymentMethod", default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "relatedId", default)]
    pub related_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Convert a RawRecord to a TransactionRecord
///
/// This function:
/// - Parses the type, payment method and status (case-insensitive)
/// - Defaults a missing payment method to CASH and a missing status to completed
/// - Requires a non-negative decimal amount
/// - Keeps an unparseable date as absent rather than dropping the record
///
/// # Returns
///
/// * `Ok(TransactionRecord)` - Successfully converted record
/// * `Err(LedgerError)` - The record must be excluded from the fold
pub fn convert_record(raw: RawRecord) -> Result<TransactionRecord, LedgerError> {
    let id = non_empty(&raw.id).unwrap_or_default().to_string();

    let type_str = non_empty(&raw.tx_type).unwrap_or_default();
    let tx_type = TransactionType::from_str(type_str)
        .map_err(|_| LedgerError::invalid_transaction_type(type_str, Some(id.as_str())))?;

    let amount = match non_empty(&raw.amount) {
        Some(amount_str) => match parse_amount(amount_str) {
            Some(amount) if !amount.is_sign_negative() => amount,
            _ => return Err(LedgerError::invalid_amount(amount_str, &id)),
        },
        None => return Err(LedgerError::missing_amount(tx_type.as_str(), &id)),
    };

    let payment_method = match non_empty(&raw.payment_method) {
        Some(method) => PaymentMethod::from_str(method)
            .map_err(|_| LedgerError::invalid_payment_method(method, &id))?,
        None => PaymentMethod::Cash,
    };

    let status = match non_empty(&raw.status) {
        Some(status) => TransactionStatus::from_str(status)
            .map_err(|_| LedgerError::invalid_status(status, &id))?,
        None => TransactionStatus::Completed,
    };

    let date = match non_empty(&raw.date) {
        Some(value) => match parse_date(value) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(tx = %id, "{}, treating as undated", e);
                None
            }
        },
        None => None,
    };

    Ok(TransactionRecord {
        id,
        tx_type,
        amount,
        payment_method,
        status,
        related_id: non_empty(&raw.related_id).map(str::to_string),
        date,
    })
}

/// Parse a decimal in plain (`1250.50`) or exponent (`1.2505e3`) notation
///
/// JSON numbers reach the readers as text rendered from an `f64` when they
/// exceed the integer range, which uses exponent notation.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Parse a ledger timestamp
///
/// Accepts RFC 3339 (offset kept as wall-clock time), ISO date-times with
/// `T` or space separators and plain `YYYY-MM-DD` dates (midnight).
pub fn parse_date(value: &str) -> Result<NaiveDateTime, LedgerError> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(date_time);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| LedgerError::invalid_date(value))
}
