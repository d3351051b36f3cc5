//! Core runtime logic for roam.
//!
//! The non-UI "engine" pieces of the navigator:
//! - [backend]: backend selection and the local / rclone listing adapters.
//! - [listing]: the [Entry]/[Listing] model and its ordering invariant.
//! - [path]: the relative-path segment model below the root boundary.
//! - [cache]: the per-session listing cache.
//! - [fetch]: the background worker running remote listings.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.

pub mod backend;
pub mod cache;
pub mod fetch;
pub mod listing;
pub mod path;
pub mod terminal;

pub use backend::{BackendKind, KindOverride, RootSpec, detect_kind, list_local, parse_root,
    partition_lsf};
pub use cache::{CachedListing, ListingCache, ListingKey};
pub use fetch::{FetchResponse, FetchTask, Fetcher};
pub use listing::{Entry, Listing, RawListing};
pub use path::{PathError, RelPath, resolve_under_root};
