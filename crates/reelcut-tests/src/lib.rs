//! Integration test crate for Reelcut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple reelcut crates to verify they work together.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod session;

#[cfg(test)]
mod persistence;
