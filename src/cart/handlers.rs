use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use time::macros::format_description;
use time::Date;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::state::AppState;

use super::dto::{AddItemRequest, CartOpened, CartView, SetQuantityRequest, VariantQuery};
use super::store::{CartError, ItemKey, LineItem};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/carts/:id", get(get_cart))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/carts", post(open_cart))
        .route("/carts/:id", delete(close_cart))
        .route("/carts/:id/items", post(add_item).delete(clear_cart))
        .route(
            "/carts/:id/items/:product_id",
            put(set_item_quantity).delete(remove_item),
        )
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn open_cart(State(state): State<AppState>) -> (StatusCode, Json<CartOpened>) {
    let cart_id = state.carts.open();
    (StatusCode::CREATED, Json(CartOpened { cart_id }))
}

#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let view = state
        .carts
        .read_cart(id, CartView::snapshot)
        .map_err(reject)?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn close_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.carts.close(id).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /carts/:id/items
///
/// The store only insists on quantity >= 1; the larger minimum for
/// date-scoped (bulk/party) orders and the cap on distinct line items are
/// this boundary's job, the same way the storefront enforced them before
/// building the payload.
#[instrument(skip(state, req), fields(product_id = %req.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let bulk_min = state.config.cart.bulk_min_quantity;
    if req.variant_date.is_some() && req.quantity < bulk_min {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("date-scoped orders require a quantity of at least {bulk_min}"),
        ));
    }

    let key = match req.variant_date {
        Some(date) => ItemKey::dated(req.product_id, date),
        None => ItemKey::product(req.product_id),
    };
    let item = LineItem {
        key,
        name: req.name,
        price: req.price,
        image: req.image,
        kind: req.kind,
        quantity: req.quantity,
    };

    let max_lines = state.config.cart.max_cart_lines;
    let view = state
        .carts
        .with_cart(id, |cart| {
            if !cart.contains(&item.key) && cart.items().len() >= max_lines {
                return Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("cart is limited to {max_lines} distinct line items"),
                ));
            }
            cart.add(item)
                .map(|()| CartView::snapshot(cart))
                .map_err(reject)
        })
        .map_err(reject)??;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, String)>,
    Query(variant): Query<VariantQuery>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let key = parse_item_key(product_id, &variant)?;
    let view = state
        .carts
        .with_cart(id, |cart| {
            cart.remove(&key);
            CartView::snapshot(cart)
        })
        .map_err(reject)?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn set_item_quantity(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, String)>,
    Query(variant): Query<VariantQuery>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let key = parse_item_key(product_id, &variant)?;
    let view = state
        .carts
        .with_cart(id, |cart| {
            cart.set_quantity(&key, req.quantity);
            CartView::snapshot(cart)
        })
        .map_err(reject)?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CartView>, (StatusCode, String)> {
    let view = state
        .carts
        .with_cart(id, |cart| {
            cart.clear();
            CartView::snapshot(cart)
        })
        .map_err(reject)?;
    Ok(Json(view))
}

// --- helpers ---

fn parse_item_key(
    product_id: String,
    variant: &VariantQuery,
) -> Result<ItemKey, (StatusCode, String)> {
    match variant.date.as_deref() {
        None => Ok(ItemKey::product(product_id)),
        Some(raw) => {
            let format = format_description!("[year]-[month]-[day]");
            let date = Date::parse(raw, &format).map_err(|e| {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("invalid variant date {raw:?}: {e}"),
                )
            })?;
            Ok(ItemKey::dated(product_id, date))
        }
    }
}

fn reject(e: CartError) -> (StatusCode, String) {
    match e {
        CartError::UnknownCart(id) => {
            error!(cart_id = %id, "operation addressed a cart that is not open");
            (StatusCode::NOT_FOUND, e.to_string())
        }
        CartError::InvalidQuantity(_) | CartError::InvalidPrice(_) | CartError::EmptyField(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::store::ItemKind;
    use time::macros::date;

    fn request(product_id: &str, quantity: u32, variant_date: Option<Date>) -> AddItemRequest {
        AddItemRequest {
            product_id: product_id.into(),
            name: format!("{product_id} name"),
            price: 12.99,
            image: String::new(),
            kind: ItemKind::Meal,
            quantity,
            variant_date,
        }
    }

    #[tokio::test]
    async fn add_then_get_reflects_merged_totals() {
        let state = AppState::fake();
        let id = state.carts.open();

        add_item(State(state.clone()), Path(id), Json(request("veg-1", 1, None)))
            .await
            .expect("first add");
        let Json(view) = add_item(State(state.clone()), Path(id), Json(request("veg-1", 2, None)))
            .await
            .expect("second add");

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 3);

        let Json(fetched) = get_cart(State(state), Path(id)).await.expect("get");
        assert_eq!(fetched.total_items, 3);
    }

    #[tokio::test]
    async fn dated_add_below_bulk_minimum_is_rejected() {
        let state = AppState::fake();
        let id = state.carts.open();
        let delivery = date!(2024 - 05 - 01);

        let (status, msg) = add_item(
            State(state.clone()),
            Path(id),
            Json(request("chicken-3", 5, Some(delivery))),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(msg.contains("at least"));

        let Json(view) = add_item(
            State(state),
            Path(id),
            Json(request("chicken-3", 20, Some(delivery))),
        )
        .await
        .expect("minimum met");
        assert_eq!(view.total_items, 20);
    }

    #[tokio::test]
    async fn add_beyond_the_line_cap_is_rejected_but_merges_still_pass() {
        use std::sync::Arc;

        use crate::cart::registry::CartRegistry;
        use crate::catalog::repo::Catalog;
        use crate::config::{AppConfig, CartConfig};

        let state = AppState {
            config: Arc::new(AppConfig {
                cart: CartConfig {
                    bulk_min_quantity: 20,
                    max_cart_lines: 2,
                },
                catalog_seed: None,
            }),
            catalog: Arc::new(Catalog::seeded()),
            carts: Arc::new(CartRegistry::new()),
        };
        let id = state.carts.open();

        add_item(State(state.clone()), Path(id), Json(request("veg-1", 1, None)))
            .await
            .expect("first row");
        add_item(State(state.clone()), Path(id), Json(request("gr-1", 1, None)))
            .await
            .expect("second row");

        let (status, msg) = add_item(State(state.clone()), Path(id), Json(request("gr-2", 1, None)))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(msg.contains("limited to 2"));

        // topping up an existing row does not open a new one
        let Json(view) = add_item(State(state), Path(id), Json(request("veg-1", 2, None)))
            .await
            .expect("merge into existing row");
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_items, 4);
    }

    #[tokio::test]
    async fn unknown_cart_maps_to_not_found() {
        let state = AppState::fake();
        let (status, _) = get_cart(State(state.clone()), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = add_item(
            State(state),
            Path(Uuid::new_v4()),
            Json(request("veg-1", 1, None)),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_candidate_maps_to_unprocessable() {
        let state = AppState::fake();
        let id = state.carts.open();
        let mut req = request("veg-1", 1, None);
        req.price = -4.0;

        let (status, _) = add_item(State(state), Path(id), Json(req))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn remove_and_set_quantity_target_the_dated_variant() {
        let state = AppState::fake();
        let id = state.carts.open();
        let delivery = date!(2024 - 05 - 01);

        add_item(
            State(state.clone()),
            Path(id),
            Json(request("chicken-3", 20, Some(delivery))),
        )
        .await
        .expect("dated add");
        add_item(State(state.clone()), Path(id), Json(request("chicken-3", 1, None)))
            .await
            .expect("plain add");

        let Json(view) = remove_item(
            State(state.clone()),
            Path((id, "chicken-3".to_string())),
            Query(VariantQuery {
                date: Some("2024-05-01".to_string()),
            }),
        )
        .await
        .expect("remove dated row");
        assert_eq!(view.items.len(), 1);
        assert!(view.items[0].key.variant_date.is_none());

        let Json(view) = set_item_quantity(
            State(state),
            Path((id, "chicken-3".to_string())),
            Query(VariantQuery::default()),
            Json(SetQuantityRequest { quantity: 0 }),
        )
        .await
        .expect("zero quantity deletes");
        assert!(view.items.is_empty());
        assert_eq!(view.total_items, 0);
    }

    #[tokio::test]
    async fn clear_and_close_lifecycle() {
        let state = AppState::fake();
        let id = state.carts.open();
        add_item(State(state.clone()), Path(id), Json(request("veg-1", 3, None)))
            .await
            .expect("add");

        let Json(view) = clear_cart(State(state.clone()), Path(id)).await.expect("clear");
        assert!(view.items.is_empty());
        assert_eq!(view.total_price, 0.0);

        close_cart(State(state.clone()), Path(id)).await.expect("close");
        let (status, _) = get_cart(State(state), Path(id)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn variant_query_rejects_garbage_dates() {
        let err = parse_item_key(
            "veg-1".into(),
            &VariantQuery {
                date: Some("not-a-date".into()),
            },
        )
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
