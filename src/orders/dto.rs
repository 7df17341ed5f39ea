use serde::{Deserialize, Serialize};

use super::model::{Order, OrderStatus, PaymentInfo, ShippingInfo};

/// Line item as the client sends it: product id as a hex string, parsed in
/// the handler.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub product: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_info: ShippingInfo,
    pub order_items: Vec<OrderItemRequest>,
    pub payment_info: PaymentInfo,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderPayload {
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct OrdersPayload {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrdersPayload {
    pub orders: Vec<Order>,
    pub total_amount: f64,
}
