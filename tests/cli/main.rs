//! CLI integration tests for gamut.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (convert, passes)
//! - Stdin/stdout handling
//! - Exit codes
//! - Config discovery and overrides

mod common;
mod convert;
