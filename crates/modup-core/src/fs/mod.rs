//! Filesystem primitives shared across features.

pub mod fingerprint;
pub mod replace;
pub mod sync;

pub use fingerprint::{Fingerprint, fingerprint_file};
pub use replace::replace_file;
pub use sync::sync_tree;
