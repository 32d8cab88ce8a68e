//! Aggregates per-stock prices into the exchange-wide index

use itertools::Itertools;
use log::info;

use crate::market::Stock;

///Geometric mean of the values: the nth root of the product. Summing logs instead of taking the
///product keeps a long list of prices from overflowing. A value of exactly zero still pulls the
///mean to zero, negative values are undefined input.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum_logs: f64 = values.iter().map(|value| value.log10()).sum();
    Some(10_f64.powf(sum_logs / values.len() as f64))
}

///The all-share index: the geometric mean of the volume-weighted price of every stock that has
///one. Stocks with no usable price are excluded rather than counted as zero, and the index is
///absent when no stock has traded inside the window.
pub fn all_share_index<'a>(stocks: impl IntoIterator<Item = &'a Stock>) -> Option<f64> {
    let prices = stocks
        .into_iter()
        .filter_map(|stock| stock.volume_weighted_price())
        .collect_vec();
    info!("INDEX: Aggregating {} priced stocks", prices.len());
    geometric_mean(&prices)
}

#[cfg(test)]
mod tests {
    use super::{all_share_index, geometric_mean};
    use crate::clock::Clock;
    use crate::market::{Market, Stock, TradeType};

    fn setup() -> Market {
        Market::gbce(Clock::fixed(1_000_000))
    }

    #[test]
    fn test_that_geometric_mean_of_empty_slice_is_absent() {
        assert_eq!(geometric_mean(&[]), None);
    }

    #[test]
    fn test_that_geometric_mean_of_uniform_values_is_that_value() {
        let mean = geometric_mean(&[105.0, 105.0, 105.0]).unwrap();
        assert!((mean - 105.0).abs() < 1e-8);
    }

    #[test]
    fn test_that_geometric_mean_of_zero_is_zero() {
        assert_eq!(geometric_mean(&[0.0, 100.0]), Some(0.0));
    }

    #[test]
    fn test_that_index_is_absent_for_empty_market() {
        let market = Market::new(Clock::fixed(1_000_000));
        assert_eq!(market.all_share_index(), None);
    }

    #[test]
    fn test_that_index_is_absent_when_nothing_has_traded() {
        let market = setup();
        assert_eq!(market.all_share_index(), None);
    }

    #[test]
    fn test_that_uniform_prices_give_the_common_price() {
        let mut market = setup();
        for symbol in market.get_symbols() {
            market.record_trade(&symbol, 100.0, TradeType::Buy, 105.0);
        }

        let index = market.all_share_index().unwrap();
        assert!((index - 105.0).abs() < 1e-8);
    }

    #[test]
    fn test_that_stocks_without_usable_price_are_excluded() {
        let clock = Clock::fixed(1_000_000);
        let mut ale = Stock::common("ALE", 23.0, 60.0, clock.clone());
        let mut joe = Stock::common("JOE", 13.0, 250.0, clock.clone());
        let tea = Stock::common("TEA", 0.0, 100.0, clock.clone());

        ale.record_trade(100.0, TradeType::Buy, 100.0);
        joe.record_trade(100.0, TradeType::Sell, 400.0);

        //TEA has no trades so the index is the mean of the two priced stocks
        let index = all_share_index([&ale, &joe, &tea]).unwrap();
        assert!((index - 200.0).abs() < 1e-8);
    }
}
