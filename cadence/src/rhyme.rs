//! Rhyme index construction and querying.
//!
//! # Module Structure
//!
//! - `postings`: packed key to sense-index maps
//! - `keys`: rhyme sub-key derivation shared by build and query
//! - `index`: [`RhymeIndex`] and its buckets
//! - `query`: [`RhymeQuery`] and [`RhymeType`]
//! - `search`: token-level rhyme lookup used by [`crate::Snapshot`]

pub mod index;
pub mod keys;
pub mod postings;
pub mod query;
pub(crate) mod search;

pub use index::{Bucket, BucketStats, IndexScheme, IndexStats, RhymeIndex};
pub use keys::RhymeKeys;
pub use postings::{BucketMap, BucketMapBuilder, BucketParts};
pub use query::{RhymeQuery, RhymeQueryBuilder, RhymeType};
