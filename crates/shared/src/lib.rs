//! Shared utilities for the AgriSense backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - HS256 session token minting and validation
//! - Common validation helpers

pub mod jwt;
pub mod password;
pub mod validation;
