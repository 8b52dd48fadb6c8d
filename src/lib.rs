//! Podium - Presentation countdown timer with a projected display window
//!
//! This library provides the core functionality for the Podium application.

pub mod app;
pub mod branding;
pub mod config;
pub mod input;
pub mod logging;
pub mod path_complete;
pub mod presentation;
pub mod surface;
pub mod timer;
pub mod tui;
