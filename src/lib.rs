//! Tradelog Client Library
//!
//! This library provides the core components for the tradelog trading
//! journal client: the backend port and its HTTP adapter, the market asset
//! registry, and the form and viewer workflows driving the journal.

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod testing;
