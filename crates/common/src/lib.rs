//! Common utilities and types shared across the live classroom crates.

#![warn(clippy::pedantic)]

/// Module for identifiers shared between the backend API and the transport
pub mod types;

/// Module for wall-clock time sources
pub mod clock;

/// Module for secret types that prevent accidental logging
pub mod secret;
