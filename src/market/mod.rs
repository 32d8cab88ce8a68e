//! Records trades against listed stocks and computes per-stock measures

use std::collections::HashMap;

use log::info;
use rand::thread_rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, DateTime};

///Trailing window over which the volume-weighted price is computed.
pub const VWP_WINDOW_SECS: i64 = 900;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum TradeType {
    Buy,
    Sell,
}

///A single executed trade. Created once when recorded and never mutated afterwards.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Trade {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub date: DateTime,
    pub typ: TradeType,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        date: impl Into<DateTime>,
        typ: TradeType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
            date: date.into(),
            typ,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum StockType {
    Common,
    Preferred,
}

///A listed security and its trade history.
///
///The trade log is append-only: trades go in through [Stock::record_trade] in call order and the
///only read access is a snapshot of the full sequence. Nothing is ever removed, so the
///volume-weighted price rescans the whole log against the clock on each call rather than
///maintaining a running window.
#[derive(Clone, Debug)]
pub struct Stock {
    symbol: String,
    stock_type: StockType,
    last_dividend: f64,
    fixed_dividend: Option<f64>,
    par_value: f64,
    trade_log: Vec<Trade>,
    clock: Clock,
}

impl Stock {
    pub fn new(
        symbol: impl Into<String>,
        stock_type: StockType,
        last_dividend: f64,
        fixed_dividend: Option<f64>,
        par_value: f64,
        clock: Clock,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            stock_type,
            last_dividend,
            fixed_dividend,
            par_value,
            trade_log: Vec::new(),
            clock,
        }
    }

    pub fn common(
        symbol: impl Into<String>,
        last_dividend: f64,
        par_value: f64,
        clock: Clock,
    ) -> Self {
        Stock::new(symbol, StockType::Common, last_dividend, None, par_value, clock)
    }

    pub fn preferred(
        symbol: impl Into<String>,
        last_dividend: f64,
        fixed_dividend: f64,
        par_value: f64,
        clock: Clock,
    ) -> Self {
        Stock::new(
            symbol,
            StockType::Preferred,
            last_dividend,
            Some(fixed_dividend),
            par_value,
            clock,
        )
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_stock_type(&self) -> &StockType {
        &self.stock_type
    }

    pub fn get_last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn get_fixed_dividend(&self) -> Option<f64> {
        self.fixed_dividend
    }

    pub fn get_par_value(&self) -> f64 {
        self.par_value
    }

    pub fn get_trade_log(&self) -> &[Trade] {
        &self.trade_log
    }

    ///Dividend yield at the given price. Absent for a non-positive price, and for a preferred
    ///stock listed without a fixed dividend.
    pub fn dividend_yield(&self, price: f64) -> Option<f64> {
        if price <= 0.0 {
            return None;
        }
        match self.stock_type {
            StockType::Common => Some(self.last_dividend / price),
            StockType::Preferred => self
                .fixed_dividend
                .map(|fixed| (fixed * self.par_value) / price),
        }
    }

    ///P/E ratio at the given price. Absent whenever the dividend yield is absent or zero, either
    ///would make the division meaningless.
    pub fn pe_ratio(&self, price: f64) -> Option<f64> {
        match self.dividend_yield(price) {
            Some(dividend) if dividend != 0.0 => Some(price / dividend),
            _ => None,
        }
    }

    ///Appends a trade stamped with the clock's current time.
    pub fn record_trade(&mut self, quantity: f64, typ: TradeType, price: f64) {
        let date = self.clock.now();
        self.record_trade_at(quantity, typ, price, date);
    }

    ///Appends a trade with an explicit execution time. Takes anything convertible to [DateTime]
    ///so callers holding raw epoch seconds do not have to wrap them first.
    pub fn record_trade_at(
        &mut self,
        quantity: f64,
        typ: TradeType,
        price: f64,
        date: impl Into<DateTime>,
    ) {
        let trade = Trade::new(self.symbol.as_str(), quantity, price, date, typ);
        info!(
            "STOCK: {} recorded {:?} of {} at {}",
            self.symbol, trade.typ, trade.quantity, trade.price
        );
        self.trade_log.push(trade);
    }

    pub fn volume_weighted_price(&self) -> Option<f64> {
        self.volume_weighted_price_over(VWP_WINDOW_SECS)
    }

    ///Volume-weighted price over a trailing window ending at the clock's current time. The
    ///cutoff is recomputed and the full trade log rescanned on every call. Absent when no
    ///quantity traded inside the window.
    pub fn volume_weighted_price_over(&self, window_secs: i64) -> Option<f64> {
        let cutoff = *self.clock.now() - window_secs;
        let mut total_quantity = 0.0;
        let mut total_value = 0.0;
        for trade in &self.trade_log {
            //The boundary trade is still inside the window
            if *trade.date >= cutoff {
                total_quantity += trade.quantity;
                total_value += trade.price * trade.quantity;
            }
        }
        if total_quantity == 0.0 {
            None
        } else {
            Some(total_value / total_quantity)
        }
    }
}

///The listing for one exchange: a stock per symbol, all sharing the market clock.
#[derive(Clone, Debug)]
pub struct Market {
    clock: Clock,
    stocks: HashMap<String, Stock>,
}

impl Market {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            stocks: HashMap::new(),
        }
    }

    ///The Global Beverage Corporation Exchange listing.
    pub fn gbce(clock: Clock) -> Self {
        let mut market = Self::new(clock);
        market.list_common("TEA", 0.0, 100.0);
        market.list_common("POP", 8.0, 100.0);
        market.list_common("ALE", 23.0, 60.0);
        market.list_preferred("GIN", 8.0, 0.02, 100.0);
        market.list_common("JOE", 13.0, 250.0);
        market
    }

    ///GBCE listing on a fixed clock with uniformly random trades recorded against every symbol.
    ///Used to feed benchmarks and tests that need a populated market.
    pub fn random(trade_count: i64) -> Self {
        let price_dist = Uniform::new(90.0, 100.0);
        let size_dist = Uniform::new(100.0, 1000.0);
        let mut rng = thread_rng();

        let mut market = Self::gbce(Clock::fixed(VWP_WINDOW_SECS));
        let symbols = market.get_symbols();
        for count in 0..trade_count {
            let random_price = price_dist.sample(&mut rng);
            let random_size = size_dist.sample(&mut rng);
            let typ = if count % 2 == 0 {
                TradeType::Buy
            } else {
                TradeType::Sell
            };

            for symbol in &symbols {
                market.record_trade(symbol, random_size, typ.clone(), random_price);
            }
        }
        market
    }

    pub fn get_clock(&self) -> Clock {
        self.clock.clone()
    }

    pub fn list_common(&mut self, symbol: impl Into<String>, last_dividend: f64, par_value: f64) {
        let symbol = symbol.into();
        let stock = Stock::common(symbol.clone(), last_dividend, par_value, self.clock.clone());
        self.stocks.insert(symbol, stock);
    }

    pub fn list_preferred(
        &mut self,
        symbol: impl Into<String>,
        last_dividend: f64,
        fixed_dividend: f64,
        par_value: f64,
    ) {
        let symbol = symbol.into();
        let stock = Stock::preferred(
            symbol.clone(),
            last_dividend,
            fixed_dividend,
            par_value,
            self.clock.clone(),
        );
        self.stocks.insert(symbol, stock);
    }

    pub fn get_stock(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    pub fn get_stock_mut(&mut self, symbol: &str) -> Option<&mut Stock> {
        self.stocks.get_mut(symbol)
    }

    pub fn get_symbols(&self) -> Vec<String> {
        self.stocks.keys().cloned().collect()
    }

    pub fn stocks(&self) -> impl Iterator<Item = &Stock> {
        self.stocks.values()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    ///Routes a trade to the named stock. A trade for an unlisted symbol fails silently so a feed
    ///carrying unknown symbols does not bring the whole market down.
    pub fn record_trade(&mut self, symbol: &str, quantity: f64, typ: TradeType, price: f64) {
        if let Some(stock) = self.stocks.get_mut(symbol) {
            stock.record_trade(quantity, typ, price);
        } else {
            info!("MARKET: Ignoring trade for unlisted symbol {}", symbol);
        }
    }

    pub fn all_share_index(&self) -> Option<f64> {
        crate::index::all_share_index(self.stocks())
    }
}
