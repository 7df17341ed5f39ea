use axum::{
    extract::{Path, Query, State},
    response::AppendHeaders,
    Json,
};
use axum_extra::extract::Query as MultiQuery;
use tracing::{info, instrument, warn};

use super::dto::{
    CreateProductRequest, DeleteReviewQuery, ProductPayload, ProductsPayload, ReviewListQuery,
    ReviewRequest, ReviewsPayload, SearchPayload, SearchQuery, UpdateProductRequest,
};
use super::model::{Product, ReviewAction};
use super::query::ListQuery;
use crate::auth::extractors::{AdminAccount, CurrentAccount};
use crate::response::{ok, ok_message, parse_id, ApiError, ApiResult, Empty, Envelope};
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "no products found with this id";

#[instrument(skip(state, admin, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<Json<Envelope<ProductPayload>>> {
    if Product::find_by_name(&state.store, &payload.name)
        .await?
        .is_some()
    {
        warn!(name = %payload.name, "duplicate product name");
        return Err(ApiError::fail("Product already present"));
    }

    let mut product = Product::new(
        payload.name,
        payload.description,
        payload.price,
        payload.category,
        payload.brand,
        payload.stock,
        admin.object_id()?,
    );
    Product::insert(&state.store, &mut product).await?;

    info!(name = %product.name, "product created");
    Ok(ok(
        "Product created successfully",
        ProductPayload { product },
    ))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    MultiQuery(query): MultiQuery<ListQuery>,
) -> ApiResult<(
    AppendHeaders<[(&'static str, String); 1]>,
    Json<Envelope<ProductsPayload>>,
)> {
    let (products, total_count) = Product::list(&state.store, &query).await?;
    Ok((
        AppendHeaders([("X-Total-Count", total_count.to_string())]),
        ok(
            "Products fetched successfully",
            ProductsPayload {
                products,
                total_count,
            },
        ),
    ))
}

#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Envelope<SearchPayload>>> {
    let search_products = Product::search(&state.store, &query.keyword).await?;
    if search_products.is_empty() {
        return Err(ApiError::fail("Sorry no results found"));
    }
    Ok(ok("Products found", SearchPayload { search_products }))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ProductPayload>>> {
    let id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    let Some(product) = Product::find_by_id(&state.store, id).await? else {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    };
    Ok(ok(
        "product fetched successfully",
        ProductPayload { product },
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<Json<Envelope<ProductPayload>>> {
    let id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    let Some(product) = Product::update_fields(&state.store, id, &payload).await? else {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    };
    Ok(ok(
        "product updated successfully",
        ProductPayload { product },
    ))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    if !Product::delete(&state.store, id).await? {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    }
    info!(product_id = %id, "product deleted");
    Ok(ok_message("product deleted successfully"))
}

#[instrument(skip(state, account, payload))]
pub async fn upsert_review(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let product_id = parse_id(&payload.product_id, PRODUCT_NOT_FOUND)?;
    let Some(mut product) = Product::find_by_id(&state.store, product_id).await? else {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    };

    let action = product.upsert_review(
        account.object_id()?,
        &account.name,
        payload.rating,
        &payload.comment,
    );
    Product::save(&state.store, &product).await?;

    info!(product = %product.name, reviewer = %account.email, ?action, "review upserted");
    Ok(match action {
        ReviewAction::Added => ok_message("Review added successfully"),
        ReviewAction::Updated => ok_message("Review updated successfully"),
    })
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> ApiResult<Json<Envelope<ReviewsPayload>>> {
    let id = parse_id(&query.id, PRODUCT_NOT_FOUND)?;
    let Some(product) = Product::find_by_id(&state.store, id).await? else {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    };
    Ok(ok(
        "Reviews fetched successfully",
        ReviewsPayload {
            reviews: product.reviews,
        },
    ))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentAccount(_): CurrentAccount,
    Query(query): Query<DeleteReviewQuery>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let product_id = parse_id(&query.product_id, PRODUCT_NOT_FOUND)?;
    let review_id = parse_id(&query.id, "Review not found")?;

    let Some(mut product) = Product::find_by_id(&state.store, product_id).await? else {
        return Err(ApiError::fail(PRODUCT_NOT_FOUND));
    };
    if !product.remove_review(review_id) {
        return Err(ApiError::fail("Review not found"));
    }
    Product::save(&state.store, &product).await?;

    Ok(ok_message("Review deleted successfully"))
}
