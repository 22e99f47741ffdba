//! embedsync-core: records and collaborator traits for media embed synchronization.
//!
//! This crate provides the types shared by every layer of the engine: the flat
//! [`MediaData`] record, its UI-shaped counterpart [`MediaDialogData`], the
//! resolution outcome types and the traits a host implements to plug in URL
//! normalization and selection snapshots.

mod dialog;
mod embed;
mod error;
mod media;
mod options;
mod traits;

pub use dialog::*;
pub use embed::*;
pub use error::*;
pub use media::*;
pub use options::*;
pub use traits::*;
