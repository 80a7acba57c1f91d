//! Seamguard: a territorial-safety heuristic core for capture-the-flag grid
//! agents.
//!
//! Exposes the board model and distance oracle, the safety and feature
//! evaluation layer, strategy presets, and the agents that tie them
//! together, for use by integration tests and the binary entry point.

pub mod agent;
pub mod board;
pub mod config;
pub mod eval;
pub mod game;
pub mod strategy;
