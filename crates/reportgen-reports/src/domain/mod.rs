//! Domain layer: commands, queries and input validation.

pub mod commands;
pub mod queries;
pub mod validation;
