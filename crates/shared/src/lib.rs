//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for users, households, expenses and shares
//! - Money helpers for two-decimal currency amounts
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and the JWT service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, DatabaseConfig, JwtSettings, ServerConfig};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
