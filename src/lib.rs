//! A library for building psychoacoustic experiment pipelines.
//!
//! The centerpiece is a maximum-length sequence (MLS) generator for
//! producing pseudorandom acoustic test stimuli, alongside adaptive
//! staircase tracking for threshold measurement, sequence-analysis
//! helpers, and optional sound-card playback. Components come in two
//! flavors: plain structures for direct synchronous use, and processing
//! nodes that can be connected with channels and run in their own
//! threads.

extern crate self as hearlab_rs;

#[macro_use]
pub mod node;
pub mod mls;
pub mod output;
pub mod prelude;
pub mod staircase;
pub mod util;

pub use crossbeam::channel::{self, Receiver, Sender};
