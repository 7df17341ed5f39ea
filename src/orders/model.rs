use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Processing => 0,
            OrderStatus::Shipped => 1,
            OrderStatus::Delivered => 2,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Processing => write!(f, "Processing"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Delivered => write!(f, "Delivered"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StatusError {
    #[error("You have already delivered this order")]
    AlreadyDelivered,
    #[error("Order status can only move forward")]
    NotForward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
    pub phone_no: String,
}

/// Line item snapshot: name and price are copied at order time so later
/// catalog edits do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub product: ObjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub id: String,
    pub status: String,
}

/// Order document in the `orders` collection. Status only ever moves forward
/// and `Delivered` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub shipping_info: ShippingInfo,
    pub order_items: Vec<OrderItem>,
    pub payment_info: PaymentInfo,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub order_status: OrderStatus,
    pub user: ObjectId,
    pub paid_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime>,
}

impl Order {
    /// Forward-only transition; stamps the delivery time on the final step.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), StatusError> {
        if self.order_status == OrderStatus::Delivered {
            return Err(StatusError::AlreadyDelivered);
        }
        if next.rank() <= self.order_status.rank() {
            return Err(StatusError::NotForward);
        }
        self.order_status = next;
        if next == OrderStatus::Delivered {
            self.delivered_at = Some(DateTime::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: Some(ObjectId::new()),
            shipping_info: ShippingInfo {
                address: "221B Baker St".into(),
                city: "London".into(),
                state: "London".into(),
                country: "UK".into(),
                pin_code: "NW1".into(),
                phone_no: "020 7224 3688".into(),
            },
            order_items: vec![OrderItem {
                name: "Widget".into(),
                price: 19.99,
                quantity: 2,
                product: ObjectId::new(),
            }],
            payment_info: PaymentInfo {
                id: "pay_123".into(),
                status: "succeeded".into(),
            },
            items_price: 39.98,
            tax_price: 4.0,
            shipping_price: 5.0,
            total_price: 48.98,
            order_status: OrderStatus::Processing,
            user: ObjectId::new(),
            paid_at: DateTime::now(),
            delivered_at: None,
        }
    }

    #[test]
    fn status_moves_forward_through_the_lifecycle() {
        let mut o = order();
        o.transition_to(OrderStatus::Shipped).unwrap();
        assert_eq!(o.order_status, OrderStatus::Shipped);
        assert!(o.delivered_at.is_none());
        o.transition_to(OrderStatus::Delivered).unwrap();
        assert_eq!(o.order_status, OrderStatus::Delivered);
        assert!(o.delivered_at.is_some());
    }

    #[test]
    fn delivered_is_terminal() {
        let mut o = order();
        o.transition_to(OrderStatus::Delivered).unwrap();
        assert_eq!(
            o.transition_to(OrderStatus::Shipped),
            Err(StatusError::AlreadyDelivered)
        );
        assert_eq!(
            o.transition_to(OrderStatus::Delivered),
            Err(StatusError::AlreadyDelivered)
        );
    }

    #[test]
    fn status_cannot_repeat_or_move_backward() {
        let mut o = order();
        assert_eq!(
            o.transition_to(OrderStatus::Processing),
            Err(StatusError::NotForward)
        );
        o.transition_to(OrderStatus::Shipped).unwrap();
        assert_eq!(
            o.transition_to(OrderStatus::Processing),
            Err(StatusError::NotForward)
        );
        assert_eq!(o.order_status, OrderStatus::Shipped);
    }

    #[test]
    fn skipping_shipped_is_allowed() {
        let mut o = order();
        o.transition_to(OrderStatus::Delivered).unwrap();
        assert_eq!(o.order_status, OrderStatus::Delivered);
        assert!(o.delivered_at.is_some());
    }

    #[test]
    fn status_serializes_as_the_wire_name() {
        let json = serde_json::to_value(OrderStatus::Processing).unwrap();
        assert_eq!(json, "Processing");
        let parsed: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }
}
