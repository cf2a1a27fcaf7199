//! # buildledger
//!
//! The dashboard application: HTTP API, CLI and configuration around
//! `buildledger-core`.

pub mod api;
pub mod cli;
pub mod config;
