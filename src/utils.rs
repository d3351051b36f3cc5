//! Miscellaneous utilities for roam.
//!
//! Holds the [cli] argument parser and small display [helpers] (color
//! parsing, width clamping) used throughout roam.

pub mod cli;
pub mod helpers;

pub use helpers::{fit_width, parse_color};
