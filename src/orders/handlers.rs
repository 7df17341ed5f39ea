use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::DateTime;
use tracing::{info, instrument, warn};

use super::dto::{
    AdminOrdersPayload, CreateOrderRequest, OrderPayload, OrdersPayload, UpdateStatusRequest,
};
use super::model::{Order, OrderItem, OrderStatus};
use crate::auth::extractors::{AdminAccount, CurrentAccount};
use crate::products::model::Product;
use crate::response::{ok, ok_message, parse_id, ApiError, ApiResult, Empty, Envelope};
use crate::state::AppState;

const ORDER_NOT_FOUND: &str = "Order not found";

#[instrument(skip(state, account, payload))]
pub async fn new_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<Json<Envelope<OrderPayload>>> {
    let mut order_items = Vec::with_capacity(payload.order_items.len());
    for item in payload.order_items {
        order_items.push(OrderItem {
            product: parse_id(&item.product, "no products found with this id")?,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        });
    }

    let mut order = Order {
        id: None,
        shipping_info: payload.shipping_info,
        order_items,
        payment_info: payload.payment_info,
        items_price: payload.items_price,
        tax_price: payload.tax_price,
        shipping_price: payload.shipping_price,
        total_price: payload.total_price,
        order_status: OrderStatus::Processing,
        user: account.object_id()?,
        paid_at: DateTime::now(),
        delivered_at: None,
    };
    Order::insert(&state.store, &mut order).await?;

    info!(account = %account.email, total = order.total_price, "order placed");
    Ok(ok("Order Placed", OrderPayload { order }))
}

#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    CurrentAccount(_): CurrentAccount,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<OrderPayload>>> {
    let id = parse_id(&id, ORDER_NOT_FOUND)?;
    let Some(order) = Order::find_by_id(&state.store, id).await? else {
        return Err(ApiError::fail(ORDER_NOT_FOUND));
    };
    Ok(ok("Order fetched successfully", OrderPayload { order }))
}

#[instrument(skip_all)]
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> ApiResult<Json<Envelope<OrdersPayload>>> {
    let orders = Order::find_by_user(&state.store, account.object_id()?).await?;
    Ok(ok("Orders fetched successfully", OrdersPayload { orders }))
}

#[instrument(skip_all)]
pub async fn admin_list_orders(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
) -> ApiResult<Json<Envelope<AdminOrdersPayload>>> {
    let orders = Order::list(&state.store).await?;
    let total_amount = orders.iter().map(|o| o.total_price).sum();
    Ok(ok(
        "Orders fetched successfully",
        AdminOrdersPayload {
            orders,
            total_amount,
        },
    ))
}

/// Stock moves only on the transition to `Delivered`: every line item's
/// product is checked for availability first, then decremented by the ordered
/// quantity. The per-product writes are still independent of each other and
/// of the order write.
#[instrument(skip(state, payload))]
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id, ORDER_NOT_FOUND)?;
    let Some(mut order) = Order::find_by_id(&state.store, id).await? else {
        return Err(ApiError::fail(ORDER_NOT_FOUND));
    };

    order
        .transition_to(payload.status)
        .map_err(|e| ApiError::fail(e.to_string()))?;

    if payload.status == OrderStatus::Delivered {
        let mut fulfilled = Vec::with_capacity(order.order_items.len());
        for item in &order.order_items {
            let Some(mut product) = Product::find_by_id(&state.store, item.product).await? else {
                return Err(ApiError::fail("no products found with this id"));
            };
            product.take_stock(item.quantity).map_err(|e| {
                warn!(product = %e.name, available = e.available, requested = e.requested,
                      "delivery rejected for insufficient stock");
                ApiError::fail(e.to_string())
            })?;
            fulfilled.push(product);
        }
        for product in &fulfilled {
            Product::save(&state.store, product).await?;
        }
    }

    Order::save(&state.store, &order).await?;

    info!(order_id = %id, status = %payload.status, "order status updated");
    Ok(ok_message(format!(
        "Order Status Updated To {}",
        payload.status
    )))
}

#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id, ORDER_NOT_FOUND)?;
    // No stock restoration on delete.
    if !Order::delete(&state.store, id).await? {
        return Err(ApiError::fail(ORDER_NOT_FOUND));
    }
    info!(order_id = %id, "order deleted");
    Ok(ok_message("Order Deleted Successfully"))
}
