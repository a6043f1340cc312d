//! # Query Configuration
//!
//! The parsed, immutable form of one client request. Protocol versions build a
//! [`QueryConfiguration`] from raw parameters; providers only ever see this type.

pub mod configuration;
pub mod order;

pub use configuration::{PageLength, QueryConfiguration, QueryConfigurationBuilder};
pub use order::{ColumnOrder, ColumnSearch, Direction};
