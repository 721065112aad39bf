//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and echoed)
//!     → endpoint.rs (SOAP envelope → payload dispatch → repository)
//!     → response envelope or fault
//!     → Send to client
//! ```

pub mod endpoint;
pub mod request;
pub mod server;
pub mod wsdl;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
