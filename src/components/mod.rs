//! Reusable UI components.

pub mod diagram;
