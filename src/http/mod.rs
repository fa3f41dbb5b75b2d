//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace, timeout, body limit, CORS)
//!     → middleware/auth.rs (bearer token → AuthenticatedUser)
//!     → extract.rs (typed payload, ownership check, validation, UnitOfWork)
//!     → handlers/ (store calls, report aggregation, commit)
//!     → error.rs / JSON response
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::ApiError;
pub use server::{ApiServer, AppState};
