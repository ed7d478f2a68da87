//! JSON format handling for REST ledger dumps and party lists
//!
//! Transactions, customers and suppliers are exported as REST list
//! responses. Each list goes through [`decode_envelope`] first, then every
//! item is decoded on its own: a malformed item is logged and counted,
//! the rest of the list survives.

use crate::cli::DecodeMode;
use crate::io::envelope::decode_envelope;
use crate::io::record::{convert_record, parse_amount, RawRecord};
use crate::types::{Customer, LedgerError, LedgerReport, Supplier, TransactionRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Scalar the backend may send either quoted or bare
///
/// Ids come out of the database as integers, amounts as strings from
/// `DecimalField` or as numbers from hand-written fixtures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum LooseString {
    Text(String),
    Number(serde_json::Number),
}

impl From<LooseString> for String {
    fn from(value: LooseString) -> Self {
        match value {
            LooseString::Text(text) => text,
            LooseString::Number(number) => number.to_string(),
        }
    }
}

/// Transaction item of the REST list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTransaction {
    #[serde(default)]
    id: Option<LooseString>,
    #[serde(rename = "type", default)]
    tx_type: Option<String>,
    #[serde(default)]
    amount: Option<LooseString>,
    #[serde(alias = "payment_method", default)]
    payment_method: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(alias = "related_id", default)]
    related_id: Option<LooseString>,
    #[serde(alias = "createdAt", alias = "created_at", default)]
    date: Option<String>,
}

impl From<ApiTransaction> for RawRecord {
    fn from(api: ApiTransaction) -> Self {
        RawRecord {
            id: api.id.map(String::from),
            tx_type: api.tx_type,
            amount: api.amount.map(String::from),
            payment_method: api.payment_method,
            status: api.status,
            related_id: api.related_id.map(String::from),
            date: api.date,
        }
    }
}

/// Customer or supplier item of the REST list
#[derive(Debug, Deserialize)]
struct ApiParty {
    id: LooseString,
    #[serde(default)]
    balance: Option<LooseString>,
}

impl ApiParty {
    fn into_parts(self) -> (String, Decimal) {
        let id = String::from(self.id);
        let balance = match self.balance.map(String::from) {
            Some(raw) => parse_amount(&raw).unwrap_or_else(|| {
                tracing::warn!(party = %id, "Invalid balance '{}', using zero", raw);
                Decimal::ZERO
            }),
            None => Decimal::ZERO,
        };
        (id, balance)
    }
}

/// Transactions decoded from a JSON document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLedger {
    pub records: Vec<TransactionRecord>,
    /// Items excluded by boundary validation
    pub rejected: u64,
}

fn decode_transaction(item: Value) -> Result<TransactionRecord, LedgerError> {
    let api: ApiTransaction = serde_json::from_value(item)?;
    convert_record(RawRecord::from(api))
}

/// Decode a transactions list response
pub fn decode_transactions(bytes: &[u8], mode: DecodeMode) -> Result<DecodedLedger, LedgerError> {
    let envelope = decode_envelope(bytes, mode)?;
    let mut ledger = DecodedLedger {
        records: Vec::with_capacity(envelope.items.len()),
        rejected: 0,
    };

    for (index, item) in envelope.items.into_iter().enumerate() {
        match decode_transaction(item) {
            Ok(record) => ledger.records.push(record),
            Err(e) => {
                ledger.rejected += 1;
                tracing::warn!(item = index, "Skipping ledger item: {}", e);
            }
        }
    }

    Ok(ledger)
}

fn decode_parties(bytes: &[u8], mode: DecodeMode) -> Result<Vec<(String, Decimal)>, LedgerError> {
    let envelope = decode_envelope(bytes, mode)?;

    Ok(envelope
        .items
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<ApiParty>(item) {
                Ok(party) => Some(party.into_parts()),
                Err(e) => {
                    tracing::warn!(item = index, "Skipping party: {}", e);
                    None
                }
            },
        )
        .collect())
}

pub fn decode_customers(bytes: &[u8], mode: DecodeMode) -> Result<Vec<Customer>, LedgerError> {
    Ok(decode_parties(bytes, mode)?
        .into_iter()
        .map(|(id, balance)| Customer::new(id, balance))
        .collect())
}

pub fn decode_suppliers(bytes: &[u8], mode: DecodeMode) -> Result<Vec<Supplier>, LedgerError> {
    Ok(decode_parties(bytes, mode)?
        .into_iter()
        .map(|(id, balance)| Supplier::new(id, balance))
        .collect())
}

fn read_file(path: &Path) -> Result<Vec<u8>, LedgerError> {
    std::fs::read(path).map_err(|e| LedgerError::open_failed(path, e))
}

/// Read a transactions list from disk
pub fn read_transactions(path: &Path, mode: DecodeMode) -> Result<DecodedLedger, LedgerError> {
    decode_transactions(&read_file(path)?, mode)
}

/// Read a customers list from disk
pub fn read_customers(path: &Path, mode: DecodeMode) -> Result<Vec<Customer>, LedgerError> {
    decode_customers(&read_file(path)?, mode)
}

/// Read a suppliers list from disk
pub fn read_suppliers(path: &Path, mode: DecodeMode) -> Result<Vec<Supplier>, LedgerError> {
    decode_suppliers(&read_file(path)?, mode)
}

/// Write the full report as pretty-printed JSON
pub fn write_report_json(report: &LedgerReport, output: &mut dyn Write) -> Result<(), LedgerError> {
    serde_json::to_writer_pretty(&mut *output, report)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
