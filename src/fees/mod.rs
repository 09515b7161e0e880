//! Fee and gas cost model

pub mod model;

pub use model::*;
