//! Mock implementations for testing purposes.
//!
//! - `clients`: mockall provider client plus hand-written fakes for timing-sensitive tests
//! - `transports`: mockall JSON-RPC transport
//! - `models`: configuration and response builders

mod clients;

pub use clients::*;
pub use models::*;
pub use transports::*;
