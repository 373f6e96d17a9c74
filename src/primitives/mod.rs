//! Low-level text utilities

pub mod display_width;
