//! Integration tests for the docraster crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between acquisition, the transform engine, and the codecs.
