//! Party directory module
//!
//! This module provides the `PartyDirectory` struct, an index over customer
//! and supplier ids built once per aggregation so return classification is
//! a hash lookup rather than a scan of the party lists.
//!
//! The directory keeps ids only. Party balances are never read or written
//! by the treasury.

use crate::core::traits::PartyLookup;
use crate::types::{Customer, PartyId, Supplier};
use std::collections::HashSet;

/// Id index over customers and suppliers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyDirectory {
    customers: HashSet<PartyId>,
    suppliers: HashSet<PartyId>,
}

impl PartyDirectory {
    /// Create an empty directory
    ///
    /// With no customers known, every return is classified as a purchase
    /// return.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from the party list snapshots
    pub fn from_parties(customers: &[Customer], suppliers: &[Supplier]) -> Self {
        PartyDirectory {
            customers: customers.iter().map(|c| c.id.clone()).collect(),
            suppliers: suppliers.iter().map(|s| s.id.clone()).collect(),
        }
    }

    pub fn add_customer(&mut self, id: impl Into<PartyId>) {
        self.customers.insert(id.into());
    }

    pub fn add_supplier(&mut self, id: impl Into<PartyId>) {
        self.suppliers.insert(id.into());
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers.len()
    }
}

impl PartyLookup for PartyDirectory {
    fn is_customer(&self, id: &str) -> bool {
        self.customers.contains(id)
    }

    fn is_supplier(&self, id: &str) -> bool {
        self.suppliers.contains(id)
    }
}
