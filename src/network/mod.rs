//! Network providers, retry, and the gas/native-price snapshot

pub mod providers;
pub mod retry;
pub mod gas;

pub use providers::*;
pub use retry::*;
pub use gas::*;
