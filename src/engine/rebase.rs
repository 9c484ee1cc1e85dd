//! Re-expressing prices in a different quote currency.
//!
//! A BTC/ETH level multiplied by the ETH/USDT rate becomes a BTC/USDT level.

use rust_decimal::Decimal;

use crate::domain::{Asks, Bids, DomainError, Order, Orderbook};

/// Returns a copy of `order` with its price multiplied by `relative_price`.
pub fn convert_price_in_order(order: &Order, relative_price: Decimal) -> Result<Order, DomainError> {
    let price = order
        .price()
        .checked_mul(relative_price)
        .ok_or(DomainError::Overflow("rebased price"))?;
    Order::new(price, order.volume())
}

/// Applies [`convert_price_in_order`] to every level, keeping their order.
pub fn convert_price_in_order_list(
    orders: &[Order],
    relative_price: Decimal,
) -> Result<Vec<Order>, DomainError> {
    orders
        .iter()
        .map(|order| convert_price_in_order(order, relative_price))
        .collect()
}

/// Rebases both sides of `book` and relabels it as `target_pair`.
pub fn convert_orderbook(
    book: &Orderbook,
    target_pair: &str,
    relative_price: Decimal,
) -> Result<Orderbook, DomainError> {
    Ok(Orderbook {
        pair: target_pair.to_string(),
        exchange: book.exchange.clone(),
        bids: Bids::new(convert_price_in_order_list(&book.bids, relative_price)?)?,
        asks: Asks::new(convert_price_in_order_list(&book.asks, relative_price)?)?,
        timestamp: book.timestamp,
    })
}
