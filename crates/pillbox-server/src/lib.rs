//! # pillbox-server
//!
//! HTTP server library for the pillbox medication reminder.
//!
//! This library provides the API handlers and state management for pillbox.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
