//! UI components.

pub mod neural_background;
