//! Loot valuation: run configuration, rate/eligibility rules, the
//! aggregation pipeline, the memoization cache and the engine façade.

pub mod cache;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod rates;

pub use cache::*;
pub use config::*;
pub use engine::*;
pub use pipeline::*;
pub use rates::*;
