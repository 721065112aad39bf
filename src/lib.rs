//! Country lookup SOAP service and client library.

pub mod client;
pub mod config;
pub mod country;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod soap;
pub mod transport;

pub use client::{ClientError, CountryClient};
pub use config::ServiceConfig;
pub use country::{Country, CountryRepository, Currency};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
