//! Two-player card game simulator
//!
//! A turn/phase state machine (the judge) drives a zone-based tabletop and
//! asks pluggable strategies for every decision. Built for running many
//! AI-vs-AI games quickly and deterministically.

pub mod config;
pub mod core;
pub mod error;
pub mod experiment;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{Result, SimError};
