//! Nodes and helpers for delivering generated stimuli, currently to the
//! system sound card.

#[cfg(feature = "audio_node")]
extern crate rodio;

#[cfg(feature = "audio_node")]
pub mod audio;
