//! Ephemeral file lifecycle.
//!
//! Every download writes into a shared scratch space under a name carrying an
//! 8 character unique id:
//!
//! ```text
//! <title-derived-stem>_<unique-id>.<ext>
//! ```
//!
//! The unique id is the only reliable lookup key. Files never outlive the
//! request that produced them: leftovers of failed attempts are removed by id,
//! a download abandoned midway drops an id-scoped [`CleanupGuard`], and the
//! transport layer moves the served file's guard into the response body so
//! the file is deleted once the body is dropped.

mod cleanup;
mod error;
mod fs_scratch;
mod traits;
mod types;

pub use cleanup::{
    cleanup, cleanup_unique_id, register_for_cleanup, register_id_for_cleanup, CleanupGuard,
};
pub use error::ScratchError;
pub use fs_scratch::FsScratchSpace;
pub(crate) use traits::{matching_names, pick_candidate};
pub use traits::{ScratchReader, ScratchSpace};
pub use types::{ProducedFile, UniqueId, TARGET_EXTENSION};
