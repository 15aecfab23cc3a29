#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fgenoese/terna-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface to the Terna transparency API.
//!
//! Re-exports the core types and traits from `terna-core` and the HTTP
//! client from `terna-client`.

// Core types and traits
pub use terna_core::*;

// Client
pub use terna_client::{
    ClientConfig, Credential, QueryParams, RateLimiter, TernaClient, TokenManager, config,
    endpoints, init_tracing,
};
