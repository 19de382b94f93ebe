//! UI rendering module for fetchstate
//!
//! This module contains the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod response_view;

pub use help_overlay::render as render_help_overlay;
pub use response_view::render as render_response;
