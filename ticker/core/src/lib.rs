//! Ticker Core - Headless Rotating Text Ticker
//!
//! This crate cycles a list of strings through a single display element,
//! sliding each one in, holding it, and sliding it out. It is completely
//! independent of any UI framework: a rendering surface implements the
//! [`Host`] trait and feeds [`HostEvent`]s back into the [`Ticker`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Host Surfaces                        │
//! │  ┌──────────┐  ┌──────────────┐  ┌─────────────────────┐ │
//! │  │   TUI    │  │ RecordingHost│  │  Browser / other    │ │
//! │  │(ratatui) │  │   (tests)    │  │                     │ │
//! │  └────┬─────┘  └──────┬───────┘  └──────────┬──────────┘ │
//! │       └───────────────┴─────────────────────┘            │
//! │            HostEvent (up)    Host calls (down)            │
//! └──────────────────────────────┼───────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────┐
//! │                        TICKER CORE                        │
//! │     Ticker ── TickerState ── Phase state machine          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use ticker_core::{InteractionMode, Ticker, TickerConfig};
//!
//! let config = TickerConfig::new(
//!     vec!["Hello".into(), "World".into()],
//!     "#ticker",
//!     2000,
//!     30,
//!     InteractionMode::Auto,
//! )?;
//! let mut ticker = Ticker::new(config, my_host)?;
//! ticker.initialize()?;
//!
//! // Host event loop
//! for event in my_host_events() {
//!     ticker.handle_event(event);
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`ticker`]: The controller and its phase logic
//! - [`state`]: [`Phase`] state machine and [`TickerState`]
//! - [`host`]: The [`Host`] contract and event types
//! - [`config`]: Configuration struct and layered TOML/env loading
//! - [`error`]: Construction and initialization errors
//! - [`test_utils`]: In-memory [`RecordingHost`](test_utils::RecordingHost)

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod host;
pub mod state;
pub mod test_utils;
pub mod ticker;

pub use config::{
    default_config_path, env_layer_from, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, InteractionMode, LoadedConfig, TickerConfig, TickerToml,
};
pub use error::TickerError;
pub use host::{EventKind, FrameId, Host, HostEvent, NodeId, TimerId, Transform};
pub use state::{Phase, TickerState};
pub use ticker::{Ticker, TEXT_CLASS_NAMES, VIEWPORT_CLASS};
