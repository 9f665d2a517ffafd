// crates/schema-forms-cli/src/lib.rs
// ============================================================================
// Module: Schema Forms CLI Library
// Description: Shared helpers for the schema-forms command-line interface.
// Purpose: Provide reusable components (message catalog) for the binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities, chiefly the message
//! catalog. The binary entry point (`src/main.rs`) imports these helpers to
//! keep all user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and formatting helpers.
pub mod i18n;
