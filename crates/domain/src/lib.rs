//! Domain layer for the AgriSense backend.
//!
//! This crate contains:
//! - Domain models (User, Device, audit entries)
//! - The device change-tracking table
//! - Role and ownership policy

pub mod models;
pub mod services;
