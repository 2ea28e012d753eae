//! # deputy-core
//!
//! API models and HTTP client for the `deputy` workforce-management CLI.
//!
//! The crate knows how to talk to the upstream REST
//! API and how to describe what went wrong when that fails. Presentation, exit
//! codes, and output modes belong to `deputy-cli`.
//!
//! ## Error Handling
//!
//! Every client operation returns [`Result<T, Error>`]. Failures reported by
//! the API, and transport failures on the way to it, surface as
//! [`Error::Api`] wrapping an [`ApiError`]:
//!
//! ```rust,no_run
//! use deputy_core::{ApiClient, ClientConfig, Error, HttpClient};
//!
//! # async fn example() -> deputy_core::Result<()> {
//! let client = HttpClient::new(&ClientConfig {
//!     base_url: Some("https://acme.na.deputy.com".into()),
//!     token: Some("token".into()),
//!     ..ClientConfig::default()
//! })?;
//!
//! match client.employee(42).await {
//!     Ok(employee) => println!("{}", employee.display_name),
//!     Err(Error::Api(api)) if api.status_code == 404 => eprintln!("no such employee"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

/// HTTP client and the `ApiClient` seam
pub mod client;
/// Error types and result aliases
pub mod error;
/// Resource models
pub mod types;

pub use client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT, HttpClient};
pub use error::{ApiError, CODE_NETWORK_ERROR, CODE_TIMEOUT, Error, Result};
pub use types::{Department, Employee, Leave, Me, Resource, Roster, Timesheet};
