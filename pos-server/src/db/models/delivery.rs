//! Delivery Model

use super::order::Customer;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Delivery status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// Whether `self → next` is a legal transition.
    ///
    /// Forward-only along pending → assigned → out-for-delivery → delivered;
    /// `cancelled` is reachable from any non-terminal state.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned)
                | (Assigned, OutForDelivery)
                | (OutForDelivery, Delivered)
                | (Pending | Assigned | OutForDelivery, Cancelled)
        )
    }
}

/// Why a requested delivery transition was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDenied {
    /// Not a legal edge of the status machine
    Illegal,
    /// Dispatch/completion requires the linked order to be served first
    OrderNotServed,
}

/// Gate a delivery status change against the linked order.
///
/// `out-for-delivery` and `delivered` additionally require the order to be
/// in `served` status.
pub fn validate_transition(
    current: DeliveryStatus,
    next: DeliveryStatus,
    order_status: super::order::OrderStatus,
) -> Result<(), TransitionDenied> {
    if !current.can_transition_to(next) {
        return Err(TransitionDenied::Illegal);
    }
    if matches!(
        next,
        DeliveryStatus::OutForDelivery | DeliveryStatus::Delivered
    ) && order_status != super::order::OrderStatus::Served
    {
        return Err(TransitionDenied::OrderNotServed);
    }
    Ok(())
}

/// Shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub postcode: Option<String>,
    pub phone: String,
}

/// Delivery entity, one-to-one with an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Linked order record id ("order:key")
    pub order_id: String,
    pub address: Address,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub eta_millis: Option<i64>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub tip: f64,
    pub created_at: i64,
}

/// Create delivery payload: the cart plus shipping details.
/// The linked order is created in the same request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryCreate {
    pub items: Vec<super::order::OrderLine>,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub tip: f64,
    pub total: f64,
    pub address: Address,
    pub slot: Option<String>,
    pub customer: Option<Customer>,
}

/// Partial update payload (PATCH)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use DeliveryStatus::*;
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(OutForDelivery));
        assert!(OutForDelivery.can_transition_to(Delivered));

        assert!(!Pending.can_transition_to(OutForDelivery));
        assert!(!Assigned.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        use DeliveryStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Assigned.can_transition_to(Cancelled));
        assert!(OutForDelivery.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_dispatch_gated_on_served_order() {
        use super::super::order::OrderStatus;
        use DeliveryStatus::*;

        // Order not served yet: dispatch and completion are blocked
        assert_eq!(
            validate_transition(Assigned, OutForDelivery, OrderStatus::Preparing),
            Err(TransitionDenied::OrderNotServed)
        );
        assert_eq!(
            validate_transition(OutForDelivery, Delivered, OrderStatus::Ready),
            Err(TransitionDenied::OrderNotServed)
        );

        // Served order unlocks both
        assert_eq!(
            validate_transition(Assigned, OutForDelivery, OrderStatus::Served),
            Ok(())
        );
        assert_eq!(
            validate_transition(OutForDelivery, Delivered, OrderStatus::Served),
            Ok(())
        );

        // Early states don't need a served order
        assert_eq!(
            validate_transition(Pending, Assigned, OrderStatus::Pending),
            Ok(())
        );
        assert_eq!(
            validate_transition(Pending, Cancelled, OrderStatus::Pending),
            Ok(())
        );

        // Illegal edges stay illegal regardless of the order
        assert_eq!(
            validate_transition(Pending, Delivered, OrderStatus::Served),
            Err(TransitionDenied::Illegal)
        );
    }
}
