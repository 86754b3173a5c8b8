//! Ticker TUI - Terminal host for the rotating text ticker
//!
//! This crate runs a [`ticker_core::Ticker`] inside a terminal. The terminal
//! plays the role of the ticker's host environment: it owns the element tree,
//! animates transforms, keeps the timers and reports clicks.
//!
//! # Architecture
//!
//! - **Stage**: In-memory element tree, clock, timers and slide motion
//!   implementing [`ticker_core::Host`]
//! - **Widgets**: Viewport renderer and row/offset layout
//! - **App**: Event loop tying crossterm input, the stage and the ticker together

pub mod app;
pub mod stage;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use stage::Stage;
