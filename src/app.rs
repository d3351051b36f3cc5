//! Application state for roam.
//!
//! - [session]: the [NavigatorSession] struct owning all loop state.
//! - [handlers]: the keyboard transition table as session methods.

pub mod handlers;
pub mod session;

pub use session::{
    NavigatorSession, PendingFetch, SelectionMode, SessionOptions, Step,
};
