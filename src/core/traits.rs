//! Core traits for party lookup
//!
//! The aggregator only needs to know whether a return references a
//! customer. Abstracting that lookup lets the same fold run over a
//! borrowed directory (sync strategy), an `Arc`-shared one (async worker
//! tasks) or a test double.

use std::sync::Arc;

/// Which way a RETURN moves cash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDirection {
    /// Goods returned by a customer, money leaves the till
    SalesReturn,
    /// Goods returned to a supplier, money comes back
    PurchaseReturn,
}

/// Membership test over customer and supplier ids
pub trait PartyLookup {
    /// Whether `id` belongs to a known customer
    fn is_customer(&self, id: &str) -> bool;

    /// Whether `id` belongs to a known supplier
    fn is_supplier(&self, id: &str) -> bool;

    /// Classify a return by the party it references
    ///
    /// Only a customer match makes a sales return. A missing id, a supplier
    /// id and an id matching nobody all fall through to a purchase return.
    fn return_direction(&self, related_id: Option<&str>) -> ReturnDirection {
        match related_id {
            Some(id) if self.is_customer(id) => ReturnDirection::SalesReturn,
            Some(id) => {
                if !self.is_supplier(id) {
                    tracing::debug!(
                        related_id = id,
                        "return references no known party, treating as purchase return"
                    );
                }
                ReturnDirection::PurchaseReturn
            }
            None => ReturnDirection::PurchaseReturn,
        }
    }
}

impl<T: PartyLookup + ?Sized> PartyLookup for &T {
    fn is_customer(&self, id: &str) -> bool {
        (**self).is_customer(id)
    }

    fn is_supplier(&self, id: &str) -> bool {
        (**self).is_supplier(id)
    }
}

impl<T: PartyLookup + ?Sized> PartyLookup for Arc<T> {
    fn is_customer(&self, id: &str) -> bool {
        (**self).is_customer(id)
    }

    fn is_supplier(&self, id: &str) -> bool {
        (**self).is_supplier(id)
    }
}
