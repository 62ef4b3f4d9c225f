//! Static game catalog: data model and the base loot index.

pub mod index;
pub mod types;

pub use index::*;
pub use types::*;
