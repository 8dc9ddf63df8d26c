//! Core state and action types
pub mod action;
pub mod light;
pub mod mode;
