//! Intermediate-code boundary.
//!
//! The downstream code-generation stage only needs to be told about
//! declared variables, functions, and parameters. This module records
//! those notifications and renders the `start-program`/`start-function`
//! listing; it computes nothing itself.

pub mod generator;
