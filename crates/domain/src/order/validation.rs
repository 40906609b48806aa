//! Input checks applied before an order reaches the store.

use order_store::{NewOrder, OrderChanges};

use super::OrderError;

fn require_text(field: &'static str, value: &str) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::EmptyField { field });
    }
    Ok(())
}

fn require_price(price: f32) -> Result<(), OrderError> {
    if !price.is_finite() || price < 0.0 {
        return Err(OrderError::InvalidPrice { price });
    }
    Ok(())
}

/// Checks the required text fields and the price of a new order.
pub fn validate_new_order(order: &NewOrder) -> Result<(), OrderError> {
    require_text("title", &order.title)?;
    require_text("description", &order.description)?;
    require_text("address", &order.address)?;
    require_text("longitude", &order.longitude)?;
    require_text("latitude", &order.latitude)?;
    if let Some(price) = order.price {
        require_price(price)?;
    }
    Ok(())
}

/// Checks the fields of a partial update that carry constraints.
///
/// Empty text is already dropped by `OrderChanges`, so only the price
/// needs checking here.
pub fn validate_changes(changes: &OrderChanges) -> Result<(), OrderError> {
    if let Some(price) = changes.price_change() {
        require_price(price)?;
    }
    Ok(())
}
