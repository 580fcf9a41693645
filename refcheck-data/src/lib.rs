//! Reference extract parsing and cache persistence for refcheck.
//!
//! Responsibilities:
//! - Parse tab-separated street and house-number extracts into the nested
//!   tables defined in `refcheck-core`.
//! - Memoise parsed tables as versioned `bincode` artifacts beside their
//!   extracts.
//!
//! Boundaries:
//! - Do not encode reconciliation rules (live in `refcheck-core`).
//! - All filesystem access goes through `refcheck-fs`.
//!
//! Invariants:
//! - A malformed extract never produces an artifact.
//! - An existing artifact is trusted until it is invalidated; a corrupt one
//!   is reported, never rebuilt behind the caller's back.
//! - No global mutable state.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
mod error;
pub mod parser;

pub use cache::{
    CACHE_FORMAT_VERSION, CACHE_MAGIC, CacheStore, CachedTable, DEFAULT_CACHE_SUFFIX, TableKind,
    load_or_build,
};
pub use error::{CacheError, LoadError, ReferenceError};
pub use parser::{NULL_STREET_SUFFIX, parse_house_numbers, parse_streets};
