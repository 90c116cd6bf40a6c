//! Object storage module
//!
//! Uploads local artifacts to a bucket. Google Cloud Storage is the
//! production backend; a local-filesystem backend mirrors the same key
//! layout for development and tests.

mod blob;

pub use blob::BlobStore;
