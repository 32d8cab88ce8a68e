//! # What is Gbce?
//!
//! Gbce models the trading ledger of the Global Beverage Corporation Exchange. Each listed stock
//! records trades into an append-only log and computes the standard per-stock measures: dividend
//! yield, P/E ratio, and the volume-weighted price over a trailing window. The per-stock prices
//! are then aggregated into the exchange-wide all-share index using a geometric mean.
//!
//! # Implementation
//!
//! The library is composed of:
//! - A clock, [Clock](crate::clock::Clock). Components that depend on the current time hold a
//! shared handle rather than reading the system clock directly, so tests can run against fixed
//! dates instead of real elapsed time. The wall variant reads system time at call time.
//! - A market, [Market](crate::market::Market), which owns one [Stock](crate::market::Stock) per
//! listed symbol and routes trade recording by symbol. Stocks can also be constructed and used
//! standalone, the market is a convenience for callers working with a whole listing.
//! - The index calculation in [index](crate::index), a free function over any collection of
//! stocks so callers are not forced through [Market](crate::market::Market).
//!
//! Every unavailable result is an absent value rather than an error: a non-positive price, an
//! empty trade window, or a market with no usable prices all produce `None` and the caller
//! decides what to do. There is no I/O anywhere in the crate so there is no failure surface
//! beyond the inputs.
pub mod clock;
pub mod index;
pub mod market;
