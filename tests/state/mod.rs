//! Tests for block composition, typed states and projection

mod layout_tests;
mod projection_tests;
