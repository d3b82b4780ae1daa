//! Foundation types for fedmap.
//!
//! This crate provides the identity and value types shared by every other
//! fedmap crate. It has no knowledge of RDF, repositories, or models.
//!
//! # Key Types
//!
//! - [`ResourceId`] — Repository-relative identifier (`foo/bar`)
//! - [`ResourceUri`] — Absolute repository address of a resource
//! - [`IdTranslator`] — Converts between ids and addresses under a base URI
//! - [`Scalar`] / [`Value`] — Attribute values as seen by application code
//! - [`Cardinality`] — Single- vs. multi-valued attributes

pub mod error;
pub mod identity;
pub mod value;

pub use error::TypeError;
pub use identity::{IdTranslator, ResourceId, ResourceUri};
pub use value::{Cardinality, Scalar, Value};
