//! # vireo Common
//!
//! Shared utilities for vireo components.
//!
//! ## Logging
//!
//! Tracing initialization with environment-driven filtering:
//!
//! ```rust,ignore
//! use vireo_common::init_logging;
//!
//! init_logging("info").unwrap();
//! ```
//!
//! ## Identifiers
//!
//! UUID and MAC address helpers for naming guests and volumes:
//!
//! ```rust
//! use vireo_common::ident;
//!
//! let uuid = ident::generate_uuid();
//! assert!(ident::validate_uuid(&uuid));
//!
//! let mac = ident::generate_mac(None);
//! assert!(ident::validate_mac(&mac));
//! ```

pub mod humanize;
pub mod ident;
pub mod logging;
pub mod textio;

pub use humanize::{humanize_time, humanize_time_str, timestamp, TimeUnit};
pub use ident::{generate_mac, generate_uuid, normalize_mac, normalize_uuid, validate_mac,
                validate_uuid};
pub use logging::{init_logging, init_logging_json};
pub use textio::{coerce_text, save_to_file};
