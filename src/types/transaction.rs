//! Transaction-related types for the treasury ledger
//!
//! This module defines the ledger entry shape consumed by the aggregator:
//! transaction types, payment methods, approval statuses and the validated
//! record itself.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Opaque to the aggregator. JSON exports that carry numeric ids are
/// rendered to their decimal string form.
pub type TransactionId = String;

/// Customer or supplier identifier
pub type PartyId = String;

/// Transaction types recorded in the ledger
///
/// Only the cash-moving types contribute to the treasury balance;
/// `Adjustment` exists for the stock audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Sale to a customer, cash comes in
    Sale,

    /// Purchase from a supplier, cash goes out
    Purchase,

    /// Operating expense, cash goes out
    Expense,

    /// Return of goods
    ///
    /// Direction depends on the related party: a return referencing a
    /// customer pays money back out, anything else is money coming back
    /// from a supplier.
    Return,

    /// Capital injected by the owner
    Capital,

    /// Cash withdrawn by the owner
    Withdrawal,

    /// Stock correction with no cash effect
    Adjustment,
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::Sale,
        TransactionType::Purchase,
        TransactionType::Expense,
        TransactionType::Return,
        TransactionType::Capital,
        TransactionType::Withdrawal,
        TransactionType::Adjustment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "SALE",
            TransactionType::Purchase => "PURCHASE",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Return => "RETURN",
            TransactionType::Capital => "CAPITAL",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ();

    /// Case-insensitive parse of the wire value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// How the transaction was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Physical cash in the till
    Cash,

    /// Mobile wallet transfer
    Wallet,

    /// Instant bank transfer
    Instapay,

    /// Recorded on credit
    ///
    /// Deferred payments move a customer or supplier balance, never cash.
    Deferred,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Wallet,
        PaymentMethod::Instapay,
        PaymentMethod::Deferred,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Wallet => "WALLET",
            PaymentMethod::Instapay => "INSTAPAY",
            PaymentMethod::Deferred => "DEFERRED",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Approval status of a transaction
///
/// Over-threshold expenses wait for approval as `Pending`; only
/// `Completed` transactions move cash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Rejected,
        ]
        .into_iter()
        .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or(())
    }
}

/// Validated ledger entry
///
/// Produced by the I/O layer after boundary validation; every field the
/// aggregator reads is already typed. The aggregator only ever borrows
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionRecord {
    /// Unique transaction identifier
    pub id: TransactionId,

    pub tx_type: TransactionType,

    /// Cash-equivalent value, never negative
    pub amount: Decimal,

    pub payment_method: PaymentMethod,

    /// Approval status (absent on the wire means completed)
    pub status: TransactionStatus,

    /// Customer or supplier this transaction refers to
    pub related_id: Option<PartyId>,

    /// When the transaction happened
    ///
    /// Used for period filtering only, never for balance math.
    pub date: Option<NaiveDateTime>,
}

impl TransactionRecord {
    /// Create a completed cash record with no party or date
    pub fn new(id: impl Into<TransactionId>, tx_type: TransactionType, amount: Decimal) -> Self {
        TransactionRecord {
            id: id.into(),
            tx_type,
            amount,
            payment_method: PaymentMethod::Cash,
            status: TransactionStatus::Completed,
            related_id: None,
            date: None,
        }
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_related_id(mut self, related_id: impl Into<PartyId>) -> Self {
        self.related_id = Some(related_id.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }
}
