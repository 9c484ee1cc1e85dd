//! Tests for the crossing and trade-simulation engine.

use super::*;
use crate::domain::{Asks, Bids, DomainError, Fee, Order, Orderbook};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn levels(raw: &[(Decimal, Decimal)]) -> Vec<Order> {
    raw.iter()
        .map(|&(p, v)| Order::new(p, v).unwrap())
        .collect()
}

fn asks(raw: &[(Decimal, Decimal)]) -> Asks {
    Asks::new(levels(raw)).unwrap()
}

fn bids(raw: &[(Decimal, Decimal)]) -> Bids {
    Bids::new(levels(raw)).unwrap()
}

fn fee(rate: Decimal) -> Fee {
    Fee::new(rate).unwrap()
}

fn book(exchange: &str, pair: &str, bid_levels: Bids, ask_levels: Asks) -> Orderbook {
    Orderbook {
        pair: pair.to_string(),
        exchange: exchange.to_string(),
        bids: bid_levels,
        asks: ask_levels,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

// ==================== Spread tests ====================

#[test]
fn test_get_spread_profitable() {
    assert_eq!(get_spread(dec!(90), dec!(100)).unwrap(), dec!(0.1));
}

#[test]
fn test_get_spread_sign() {
    let bid = dec!(100);
    for ask in [dec!(1), dec!(50), dec!(99.99999)] {
        assert!(get_spread(ask, bid).unwrap() > Decimal::ZERO, "ask {ask}");
    }
    for ask in [dec!(100), dec!(100.00001), dec!(250)] {
        assert!(get_spread(ask, bid).unwrap() <= Decimal::ZERO, "ask {ask}");
    }
}

#[test]
fn test_get_spread_rejects_non_positive_bid() {
    assert_eq!(
        get_spread(dec!(1), Decimal::ZERO),
        Err(EngineError::NonPositiveBid(Decimal::ZERO))
    );
    assert!(get_spread(dec!(1), dec!(-5)).is_err());
}

#[test]
fn test_get_spread_overflow_is_error() {
    assert_eq!(
        get_spread(-Decimal::MAX, Decimal::MAX),
        Err(EngineError::Overflow("spread"))
    );
}

#[test]
fn test_book_spread() {
    let b = book(
        "ex",
        "BTC/USDT",
        bids(&[(dec!(100), dec!(1))]),
        asks(&[(dec!(101), dec!(1))]),
    );
    assert_eq!(book_spread(&b), Some(dec!(-0.01)));

    let empty = book("ex", "BTC/USDT", bids(&[]), asks(&[(dec!(101), dec!(1))]));
    assert_eq!(book_spread(&empty), None);
}

// ==================== Rebase tests ====================

#[test]
fn test_convert_price_in_order() {
    let order = Order::new(dec!(0.05), dec!(2)).unwrap();
    let converted = convert_price_in_order(&order, dec!(3000)).unwrap();

    assert_eq!(converted.price(), dec!(150));
    assert_eq!(converted.volume(), order.volume());
    assert_eq!(order.price(), dec!(0.05));
}

#[test]
fn test_convert_price_in_order_list_keeps_order() {
    let list = levels(&[(dec!(0.05), dec!(1)), (dec!(0.04), dec!(2)), (dec!(0.03), dec!(3))]);
    let converted = convert_price_in_order_list(&list, dec!(2)).unwrap();

    let prices: Vec<_> = converted.iter().map(Order::price).collect();
    let volumes: Vec<_> = converted.iter().map(Order::volume).collect();
    assert_eq!(prices, vec![dec!(0.10), dec!(0.08), dec!(0.06)]);
    assert_eq!(volumes, vec![dec!(1), dec!(2), dec!(3)]);
}

#[test]
fn test_convert_price_rejects_non_positive_rate() {
    let order = Order::new(dec!(10), dec!(1)).unwrap();
    assert_eq!(
        convert_price_in_order(&order, Decimal::ZERO),
        Err(DomainError::InvalidPrice(Decimal::ZERO))
    );
    assert!(convert_price_in_order(&order, dec!(-1)).is_err());
}

#[test]
fn test_convert_price_overflow_is_error() {
    let order = Order::new(Decimal::MAX / dec!(2), dec!(1)).unwrap();
    assert_eq!(
        convert_price_in_order(&order, dec!(3)),
        Err(DomainError::Overflow("rebased price"))
    );
}

#[test]
fn test_convert_orderbook() {
    let b = book(
        "binance",
        "BTC/ETH",
        bids(&[(dec!(20), dec!(1)), (dec!(19), dec!(2))]),
        asks(&[(dec!(21), dec!(1))]),
    );
    let rebased = convert_orderbook(&b, "BTC/USDT", dec!(3000)).unwrap();

    assert_eq!(rebased.pair, "BTC/USDT");
    assert_eq!(rebased.exchange, "binance");
    assert_eq!(rebased.timestamp, b.timestamp);
    assert_eq!(rebased.bids[0].price(), dec!(60000));
    assert_eq!(rebased.bids[1].price(), dec!(57000));
    assert_eq!(rebased.asks[0].price(), dec!(63000));
    assert_eq!(b.pair, "BTC/ETH");
}

// ==================== Walker tests ====================

fn walk_levels() -> Asks {
    asks(&[(dec!(100), dec!(0.1)), (dec!(101), dec!(0.2))])
}

#[test]
fn test_trade_by_amount_partial_first_level() {
    let fill = trade_by_amount(&walk_levels(), dec!(5));

    assert_eq!(fill.deals.len(), 1);
    assert_eq!(fill.deals[0].price, dec!(100));
    assert_eq!(fill.deals[0].volume, dec!(0.05));
    assert!(fill.is_complete());
}

#[test]
fn test_trade_by_amount_spans_levels() {
    let fill = trade_by_amount(&walk_levels(), dec!(30));

    assert_eq!(fill.deals.len(), 2);
    assert_eq!(fill.deals[0].volume, dec!(0.1));
    assert_eq!(fill.deals[1].price, dec!(101));
    assert!(fill.total_notional().unwrap() <= dec!(30));
    assert!(fill.is_complete());
}

#[test]
fn test_trade_by_amount_exact_level() {
    let fill = trade_by_amount(&walk_levels(), dec!(10));

    assert_eq!(fill.deals.len(), 1);
    assert_eq!(fill.deals[0].volume, dec!(0.1));
    assert_eq!(fill.unfilled, Decimal::ZERO);
}

#[test]
fn test_trade_by_amount_insufficient_liquidity() {
    let fill = trade_by_amount(&walk_levels(), dec!(100));

    assert_eq!(fill.deals.len(), 2);
    assert_eq!(fill.total_notional(), Some(dec!(30.2)));
    assert_eq!(fill.unfilled, dec!(69.8));
    assert!(!fill.is_complete());
}

#[test]
fn test_trade_by_amount_never_exceeds_target_after_rounding() {
    let list = asks(&[(dec!(3), dec!(1))]);
    let fill = trade_by_amount(&list, dec!(2));

    assert_eq!(fill.deals.len(), 1);
    assert!(fill.total_notional().unwrap() <= dec!(2));
    assert!(fill.deals[0].volume > dec!(0.666));
}

#[test]
fn test_trade_by_amount_bound_property() {
    let list = asks(&[
        (dec!(7), dec!(0.3)),
        (dec!(7.7), dec!(1.1)),
        (dec!(9.1), dec!(0.05)),
        (dec!(13), dec!(2)),
    ]);
    for target in [dec!(0.01), dec!(1), dec!(2.1), dec!(3), dec!(10.5), dec!(33.333), dec!(1000)] {
        let fill = trade_by_amount(&list, target);
        let notional = fill.total_notional().unwrap();
        assert!(notional <= target, "target {target}");
        assert!(notional + fill.unfilled <= target);
    }
}

#[test]
fn test_trade_by_amount_non_positive_target() {
    assert!(trade_by_amount(&walk_levels(), Decimal::ZERO).deals.is_empty());

    let fill = trade_by_amount(&walk_levels(), dec!(-3));
    assert!(fill.deals.is_empty());
    assert!(fill.is_complete());
}

#[test]
fn test_trade_by_volume_partial_second_level() {
    let fill = trade_by_volume(&walk_levels(), dec!(0.25));

    assert_eq!(fill.deals.len(), 2);
    assert_eq!(fill.deals[0].volume, dec!(0.1));
    assert_eq!(fill.deals[1].volume, dec!(0.15));
    assert_eq!(fill.total_volume(), Some(dec!(0.25)));
    assert!(fill.is_complete());
}

#[test]
fn test_trade_by_volume_insufficient_liquidity() {
    let fill = trade_by_volume(&walk_levels(), dec!(1));

    assert_eq!(fill.total_volume(), Some(dec!(0.3)));
    assert_eq!(fill.unfilled, dec!(0.7));
    assert!(!fill.is_complete());
}

#[test]
fn test_trade_by_volume_bound_property() {
    let list = asks(&[(dec!(7), dec!(0.3)), (dec!(8), dec!(1.1)), (dec!(9), dec!(0.05))]);
    for target in [dec!(0.01), dec!(0.3), dec!(0.31), dec!(1.4), dec!(1.45), dec!(5)] {
        let fill = trade_by_volume(&list, target);
        assert!(fill.total_volume().unwrap() <= target, "target {target}");
    }
}

#[test]
fn test_walkers_do_not_mutate_levels() {
    let list = walk_levels();
    let before = list.clone();
    trade_by_amount(&list, dec!(15));
    trade_by_volume(&list, dec!(0.15));
    assert_eq!(list, before);
}

#[test]
fn test_fill_average_price() {
    let fill = trade_by_volume(&asks(&[(dec!(100), dec!(1)), (dec!(110), dec!(1))]), dec!(2));
    assert_eq!(fill.average_price(), Some(dec!(105)));
    assert_eq!(Fill::default().average_price(), None);
}

#[test]
fn test_trade_by_volume_sells_into_bids() {
    let b = bids(&[(dec!(100), dec!(0.5)), (dec!(99), dec!(1))]);
    let fill = trade_by_volume(&b, dec!(1));

    assert_eq!(fill.deals[0].price, dec!(100));
    assert_eq!(fill.deals[1].price, dec!(99));
    assert_eq!(fill.deals[1].volume, dec!(0.5));
    assert_eq!(fill.total_notional(), Some(dec!(99.5)));
}

#[test]
fn test_unsorted_levels_never_reach_walker() {
    let shuffled = levels(&[(dec!(101), dec!(1)), (dec!(100), dec!(1))]);
    assert!(matches!(
        Asks::new(shuffled.clone()),
        Err(DomainError::UnsortedLevels { index: 1, .. })
    ));

    // The same levels are a valid bid side.
    let fill = trade_by_amount(&Bids::new(shuffled).unwrap(), dec!(50.5));
    assert_eq!(fill.deals[0].price, dec!(101));
}

#[test]
fn test_trade_by_amount_overflowing_level_is_partial() {
    let price = Decimal::from_i128_with_scale(10i128.pow(20), 0);
    let list = asks(&[(price, Decimal::from(10_000_000_000u64))]);
    assert_eq!(list[0].notional(), None);

    let fill = trade_by_amount(&list, dec!(5));

    assert_eq!(fill.deals.len(), 1);
    assert_eq!(fill.deals[0].price, price);
    assert!(fill.deals[0].volume > Decimal::ZERO);
    assert!(fill.total_notional().unwrap() <= dec!(5));
    assert!(fill.is_complete());
}

// ==================== Matcher tests ====================

fn scenario_asks() -> Asks {
    asks(&[(dec!(90), dec!(0.1)), (dec!(91), dec!(0.2)), (dec!(92), dec!(0.3))])
}

fn scenario_bids() -> Bids {
    bids(&[(dec!(100), dec!(0.2)), (dec!(99), dec!(0.2)), (dec!(98), dec!(0.3))])
}

#[test]
fn test_matcher_scenario() {
    let deals =
        find_arbitrage_deals(&scenario_asks(), &scenario_bids(), Decimal::ZERO, Decimal::ZERO)
            .unwrap();

    let summary: Vec<_> = deals
        .iter()
        .map(|d| (d.price_buy(), d.price_sell(), d.volume()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (dec!(90), dec!(100), dec!(0.1)),
            (dec!(91), dec!(100), dec!(0.1)),
            (dec!(91), dec!(99), dec!(0.1)),
            (dec!(92), dec!(99), dec!(0.1)),
            (dec!(92), dec!(98), dec!(0.2)),
        ]
    );
    assert_eq!(deals[0].spread(), dec!(0.1));
}

#[test]
fn test_matcher_remainder() {
    let crossing = cross_books(&scenario_asks(), &scenario_bids(), Fee::ZERO, Fee::ZERO).unwrap();

    assert!(crossing.asks.is_empty());
    assert_eq!(crossing.bids.len(), 1);
    assert_eq!(crossing.bids[0].price(), dec!(98));
    assert_eq!(crossing.bids[0].volume(), dec!(0.1));
    assert_eq!(crossing.total_volume(), Some(dec!(0.6)));
}

#[test]
fn test_matcher_does_not_touch_input_books() {
    let a = scenario_asks();
    let b = scenario_bids();
    cross_books(&a, &b, Fee::ZERO, Fee::ZERO).unwrap();

    assert_eq!(a, scenario_asks());
    assert_eq!(b, scenario_bids());
}

#[test]
fn test_matcher_stops_at_unprofitable_pair() {
    let a = asks(&[(dec!(95), dec!(1)), (dec!(101), dec!(1))]);
    let b = bids(&[(dec!(100), dec!(5))]);
    let crossing = cross_books(&a, &b, Fee::ZERO, Fee::ZERO).unwrap();

    assert_eq!(crossing.deals.len(), 1);
    assert_eq!(crossing.deals[0].volume(), dec!(1));
    assert_eq!(crossing.asks[0].price(), dec!(101));
    assert_eq!(crossing.bids[0].volume(), dec!(4));
}

#[test]
fn test_matcher_equal_prices_do_not_cross() {
    let a = asks(&[(dec!(100), dec!(1))]);
    let b = bids(&[(dec!(100), dec!(1))]);
    let deals = find_arbitrage_deals(&a, &b, Decimal::ZERO, Decimal::ZERO).unwrap();
    assert!(deals.is_empty());
}

#[test]
fn test_matcher_fees_remove_thin_spread() {
    let a = asks(&[(dec!(100), dec!(1))]);
    let b = bids(&[(dec!(101), dec!(1))]);

    let deals = find_arbitrage_deals(&a, &b, dec!(0.005), dec!(0.005)).unwrap();
    assert!(deals.is_empty());

    let deals = find_arbitrage_deals(&a, &b, dec!(0.001), dec!(0.001)).unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].fee_buy(), fee(dec!(0.001)));
    assert!(deals[0].spread() > Decimal::ZERO);
}

#[test]
fn test_matcher_asymmetric_fees() {
    let a = asks(&[(dec!(100), dec!(1))]);
    let b = bids(&[(dec!(102), dec!(1))]);

    // 100.5 vs 101.49: still crosses
    assert_eq!(find_arbitrage_deals(&a, &b, dec!(0.005), dec!(0.005)).unwrap().len(), 1);
    // 101.9 vs 101.49: does not
    assert!(find_arbitrage_deals(&a, &b, dec!(0.019), dec!(0.005)).unwrap().is_empty());
}

#[test]
fn test_matcher_equal_volumes_consume_both_levels() {
    let a = asks(&[(dec!(90), dec!(0.5)), (dec!(95), dec!(1))]);
    let b = bids(&[(dec!(100), dec!(0.5)), (dec!(96), dec!(1))]);
    let crossing = cross_books(&a, &b, Fee::ZERO, Fee::ZERO).unwrap();

    assert_eq!(crossing.deals.len(), 2);
    assert_eq!(crossing.deals[0].volume(), dec!(0.5));
    assert_eq!(crossing.deals[1].price_buy(), dec!(95));
    assert_eq!(crossing.deals[1].price_sell(), dec!(96));
    assert!(crossing.asks.is_empty());
    assert!(crossing.bids.is_empty());
}

#[test]
fn test_matcher_rejects_invalid_fees() {
    let result = find_arbitrage_deals(&scenario_asks(), &scenario_bids(), dec!(1), Decimal::ZERO);
    assert_eq!(
        result,
        Err(EngineError::Domain(DomainError::InvalidFee(dec!(1))))
    );

    let result =
        find_arbitrage_deals(&scenario_asks(), &scenario_bids(), Decimal::ZERO, dec!(-0.1));
    assert!(matches!(
        result,
        Err(EngineError::Domain(DomainError::InvalidFee(_)))
    ));
}

#[test]
fn test_matcher_empty_books() {
    assert!(cross_books(&asks(&[]), &scenario_bids(), Fee::ZERO, Fee::ZERO)
        .unwrap()
        .deals
        .is_empty());
    assert!(cross_books(&scenario_asks(), &bids(&[]), Fee::ZERO, Fee::ZERO)
        .unwrap()
        .deals
        .is_empty());
}

#[test]
fn test_matcher_invariants_hold_across_books() {
    let cases = [
        (
            asks(&[(dec!(10), dec!(3)), (dec!(10.5), dec!(1.5)), (dec!(11), dec!(7))]),
            bids(&[(dec!(12), dec!(0.7)), (dec!(11.2), dec!(4)), (dec!(10.1), dec!(9))]),
            fee(dec!(0.002)),
            fee(dec!(0.001)),
        ),
        (
            scenario_asks(),
            scenario_bids(),
            fee(dec!(0.03)),
            fee(dec!(0.02)),
        ),
        (
            asks(&[(dec!(1.001), dec!(1000)), (dec!(1.002), dec!(1000))]),
            bids(&[(dec!(1.01), dec!(1)), (dec!(1.009), dec!(2)), (dec!(1.0), dec!(5))]),
            fee(dec!(0.0005)),
            Fee::ZERO,
        ),
    ];

    for (a, b, fee_buy, fee_sell) in cases {
        let crossing = cross_books(&a, &b, fee_buy, fee_sell).unwrap();

        for deal in &crossing.deals {
            assert!(deal.spread() > Decimal::ZERO);
        }

        let ask_total: Decimal = a.iter().map(Order::volume).sum();
        let bid_total: Decimal = b.iter().map(Order::volume).sum();
        assert!(crossing.total_volume().unwrap() <= ask_total.min(bid_total));

        let again = cross_books(&crossing.asks, &crossing.bids, fee_buy, fee_sell).unwrap();
        assert!(again.deals.is_empty());
    }
}

#[test]
fn test_matcher_fee_overflow_is_error() {
    let a = asks(&[(Decimal::MAX / dec!(2), dec!(1))]);
    let b = bids(&[(dec!(100), dec!(1))]);

    let result = find_arbitrage_deals(&a, &b, dec!(0.5), Decimal::ZERO);
    assert_eq!(result, Err(EngineError::Overflow("fee-adjusted ask")));
}

#[test]
fn test_matcher_deal_amount_overflow_is_error() {
    let a = asks(&[(dec!(90), Decimal::MAX)]);
    let b = bids(&[(dec!(100), Decimal::MAX)]);

    let result = cross_books(&a, &b, Fee::ZERO, Fee::ZERO);
    assert!(matches!(result, Err(EngineError::Overflow(_))));
}

// ==================== Detector tests ====================

fn buy_side_book() -> Orderbook {
    book("alpha", "BTC/USDT", bids(&[(dec!(89), dec!(1))]), scenario_asks())
}

fn sell_side_book() -> Orderbook {
    book("beta", "BTC/USDT", scenario_bids(), asks(&[(dec!(101), dec!(1))]))
}

#[test]
fn test_detect_finds_opportunity() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let params = DetectionParams {
        opportunity_ttl: Duration::seconds(5),
        ..Default::default()
    };

    let opp = detect(&buy_side_book(), &sell_side_book(), Fee::ZERO, Fee::ZERO, &params, now)
        .unwrap()
        .unwrap();

    assert_eq!(opp.buy_exchange, "alpha");
    assert_eq!(opp.sell_exchange, "beta");
    assert_eq!(opp.quantity, dec!(0.6));
    assert_eq!(opp.deals.len(), 5);
    assert_eq!(opp.expires_at, now + Duration::seconds(5));
    assert!(opp.is_profitable());
}

#[test]
fn test_detect_reverse_direction_has_nothing() {
    let result = detect(
        &sell_side_book(),
        &buy_side_book(),
        Fee::ZERO,
        Fee::ZERO,
        &DetectionParams::default(),
        Utc::now(),
    )
    .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_detect_applies_thresholds() {
    let now = Utc::now();
    let too_much_volume = DetectionParams {
        min_quantity: dec!(1),
        ..Default::default()
    };
    assert!(detect(&buy_side_book(), &sell_side_book(), Fee::ZERO, Fee::ZERO, &too_much_volume, now)
        .unwrap()
        .is_none());

    let too_much_profit = DetectionParams {
        min_profit_percent: dec!(50),
        ..Default::default()
    };
    assert!(detect(&buy_side_book(), &sell_side_book(), Fee::ZERO, Fee::ZERO, &too_much_profit, now)
        .unwrap()
        .is_none());
}

#[test]
fn test_detect_rejects_pair_mismatch() {
    let mut other = sell_side_book();
    other.pair = "ETH/USDT".to_string();

    let err = detect(
        &buy_side_book(),
        &other,
        Fee::ZERO,
        Fee::ZERO,
        &DetectionParams::default(),
        Utc::now(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EngineError::PairMismatch {
            buy: "BTC/USDT".to_string(),
            sell: "ETH/USDT".to_string()
        }
    );
}
