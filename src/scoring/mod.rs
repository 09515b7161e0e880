//! Confidence and risk scoring

pub mod confidence;
pub mod risk;
pub mod calibration;
pub mod volatility;

pub use confidence::*;
pub use risk::*;
pub use calibration::*;
pub use volatility::*;
