#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fgenoese/terna-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the Terna transparency API.
//!
//! This crate holds everything that does not touch the network:
//!
//! - [`Table`](table::Table) - Normalized, indexed result of a data call
//! - [`transform`](transform::transform) - Raw JSON payload to [`Table`](table::Table)
//! - [`adjust_timestamp`](timestamp::adjust_timestamp) - Quarter-hour timestamp reconstruction
//! - [`LoadDataProvider`](provider::LoadDataProvider),
//!   [`GenerationDataProvider`](provider::GenerationDataProvider),
//!   [`TransmissionDataProvider`](provider::TransmissionDataProvider) - Data operations
//! - [`TernaError`](error::TernaError) - Error taxonomy

/// Error types for API operations.
pub mod error;
/// Provider traits for fetching transparency data.
pub mod provider;
/// Normalized table model and polars conversion.
pub mod table;
/// Localized timestamp reconstruction.
pub mod timestamp;
/// Payload normalization.
pub mod transform;
/// Query selector types (bidding zones, generation types, date ranges).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{RETRYABLE_STATUS_CODES, Result, TernaError};
pub use provider::{
    GenerationDataProvider, LoadDataProvider, TransmissionDataProvider, TransparencyProvider,
};
pub use table::{ColumnValues, Table, TableColumn, TableIndex};
pub use timestamp::{MARKET_TIMEZONE, adjust_timestamp};
pub use transform::transform;
pub use types::{BiddingZone, DateRange, EnergyBalanceType, GenerationType};
