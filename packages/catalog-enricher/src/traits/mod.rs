//! Seams to the outside world.
//!
//! Pipelines only talk to these traits; the `adapters` module provides the
//! real network-backed implementations and `testing` the mocks.

pub mod generator;
pub mod media;

pub use generator::ContentGenerator;
pub use media::{ImageSearch, LinkChecker, LinkStatus, VideoSearch};
