//! Error types and error handling for the front end.
//!
//! This module defines the errors the parser records while building an AST:
//!
//! - Error structures with source position information
//! - One variant per way a parse routine can fail
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
