//! Country domain: records and the read-only lookup service.
//!
//! # Data Flow
//! ```text
//! process start
//!     → repository.rs (seed dataset, index by name)
//!     → Arc<CountryRepository> shared with the SOAP endpoint
//!
//! getCountryRequest(name)
//!     → CountryRepository::find_country (exact, case-sensitive)
//!     → Some(&Country) | None
//! ```
//!
//! # Design Decisions
//! - Dataset is immutable after construction; no locking needed
//! - A missing country is a valid answer, not an error

pub mod model;
pub mod repository;

pub use model::{Country, Currency, ParseCurrencyError};
pub use repository::CountryRepository;
