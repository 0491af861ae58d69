//! CLI library components for the play-by-play reconciler.

pub mod files;
pub mod logging;
