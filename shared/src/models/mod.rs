//! Data models
//!
//! Shared between booking-server and its clients (via API).
//! All IDs are `i64`.

pub mod dining_table;
pub mod reservation;
pub mod zone;

// Re-exports
pub use dining_table::*;
pub use reservation::*;
pub use zone::*;
