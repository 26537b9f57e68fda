//! Filesystem operations: bulk copy/move of resolved folders, per chunk.

mod helpers;
mod metadata;
mod transact;
mod tree;

pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use metadata::preserve_metadata;
pub use transact::{TransferMode, TransferOptions, transact_chunk};
pub use tree::{FORCE_DIR_COPY_ENV, copy_tree, move_tree, remove_existing};
