//! Kido Butai rules engine library.
//!
//! Exposes the board representation, dice, movement rules, resolver, AI,
//! scenarios, game store, protocol, and simulation modules for use by the
//! binaries, integration tests, and benchmarks.

pub mod ai;
pub mod board;
pub mod dice;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod scenario;
pub mod simulate;
