//! Reusable UI widgets.

pub mod chart;
pub mod controls;
pub mod picker;
pub mod text_input;
