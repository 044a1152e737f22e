//! # regsweep-image
//!
//! Container registry access for regsweep.
//!
//! This crate provides:
//! - Image tag records as listed by the registry
//! - `repository@digest` image references
//! - The [`ImageRegistry`] trait and its `gcloud` implementation

#![warn(missing_docs)]

pub mod record;
pub mod reference;
/// Image registry client.
pub mod registry;

pub use record::ImageRecord;
pub use reference::ImageRef;
pub use registry::{GcloudRegistry, ImageRegistry};
