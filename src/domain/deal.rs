//! Matched cross-book fills.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Fee;

/// ArbitrageDeal pairs a buy on one book with a sell on another.
///
/// Only the matcher creates these. `spread` is derived from the other
/// fields: (sell·(1 − fee_sell) − buy·(1 + fee_buy)) / (sell·(1 − fee_sell)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArbitrageDeal {
    price_buy: Decimal,
    price_sell: Decimal,
    volume: Decimal,
    fee_buy: Fee,
    fee_sell: Fee,
    spread: Decimal,
    buy_cost: Decimal,
    sell_proceeds: Decimal,
}

impl ArbitrageDeal {
    /// Returns None if a derived amount does not fit in a Decimal.
    /// `price_sell` must be positive.
    pub(crate) fn new(
        price_buy: Decimal,
        price_sell: Decimal,
        volume: Decimal,
        fee_buy: Fee,
        fee_sell: Fee,
    ) -> Option<Self> {
        let net_sell = fee_sell.sell_price(price_sell)?;
        let gross_buy = fee_buy.buy_price(price_buy)?;
        Some(Self {
            price_buy,
            price_sell,
            volume,
            fee_buy,
            fee_sell,
            spread: (net_sell - gross_buy).checked_div(net_sell)?,
            buy_cost: gross_buy.checked_mul(volume)?,
            sell_proceeds: net_sell.checked_mul(volume)?,
        })
    }

    pub fn price_buy(&self) -> Decimal {
        self.price_buy
    }

    pub fn price_sell(&self) -> Decimal {
        self.price_sell
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn fee_buy(&self) -> Fee {
        self.fee_buy
    }

    pub fn fee_sell(&self) -> Fee {
        self.fee_sell
    }

    pub fn spread(&self) -> Decimal {
        self.spread
    }

    /// Quote spent on the buy side, fee included.
    pub fn buy_cost(&self) -> Decimal {
        self.buy_cost
    }

    /// Quote received on the sell side, fee deducted.
    pub fn sell_proceeds(&self) -> Decimal {
        self.sell_proceeds
    }

    /// Net profit of this fill after both fees.
    pub fn profit(&self) -> Decimal {
        self.sell_proceeds - self.buy_cost
    }
}
