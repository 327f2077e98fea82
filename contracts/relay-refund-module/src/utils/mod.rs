//! Shared utilities for the relay module.

pub mod crypto;
pub mod keys;
