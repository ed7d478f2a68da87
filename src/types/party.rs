//! Customer and supplier types
//!
//! Parties are external entities owned by the backend. The treasury only
//! reads their ids to decide which way a return moves cash; balances are
//! carried so a loaded party list round-trips without loss.

use super::transaction::PartyId;
use rust_decimal::Decimal;
use serde::Serialize;

/// Customer as returned by the customers list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: PartyId,

    /// Signed balance, negative means the customer owes money
    pub balance: Decimal,
}

/// Supplier as returned by the suppliers list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supplier {
    pub id: PartyId,

    /// Signed balance, positive means the business owes the supplier
    pub balance: Decimal,
}

impl Customer {
    pub fn new(id: impl Into<PartyId>, balance: Decimal) -> Self {
        Customer {
            id: id.into(),
            balance,
        }
    }
}

impl Supplier {
    pub fn new(id: impl Into<PartyId>, balance: Decimal) -> Self {
        Supplier {
            id: id.into(),
            balance,
        }
    }
}
