// crates/schema-forms-config/src/lib.rs
// ============================================================================
// Module: Schema Forms Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for schema-forms.toml semantics.
// Dependencies: schema-forms-core, serde, toml
// ============================================================================

//! ## Overview
//! `schema-forms-config` defines the configuration model for the form
//! compiler, the validator collaborator, and event sinks. Loading is strict
//! and fail-closed: oversized, non-UTF-8, or out-of-range configuration is
//! rejected rather than clamped.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
