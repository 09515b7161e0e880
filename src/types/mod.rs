//! Core data types and structures

pub mod assets;
pub mod venues;
pub mod quotes;
pub mod opportunity;
pub mod execution;
pub mod registry;

pub use assets::*;
pub use venues::*;
pub use quotes::*;
pub use opportunity::*;
pub use execution::*;
pub use registry::*;
