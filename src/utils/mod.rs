//! Utility functions and helpers for the recon-state library.

pub mod matrix_convert;
