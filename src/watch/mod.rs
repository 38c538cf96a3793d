// src/watch/mod.rs

//! Log watching and matching.
//!
//! This module is responsible for:
//! - Tracking how far into the log file we have read (`tracker`).
//! - Noticing when the file was truncated or replaced, and finding the
//!   rotated sibling that holds the lines we would otherwise lose
//!   (`rotation`).
//! - Testing lines against the ordered pattern table (`matcher`).
//! - Driving all of the above on a fixed interval (`poll`).
//!
//! It does **not** know about config files or the CLI.

pub mod matcher;
pub mod poll;
pub mod rotation;
pub mod state;
pub mod tracker;

pub use matcher::PatternTable;
pub use poll::{PollLoop, Transition};
pub use rotation::{
    classify, find_renamed_predecessor, find_rotated_sibling, RotatedSibling, Rotation,
};
pub use state::WatchState;
pub use tracker::{read_finished_from, read_from, LineRead};
