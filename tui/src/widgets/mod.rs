//! Widgets

mod ticker_view;

pub use ticker_view::{container_rect, TickerLayout, TickerView, VIEWPORT_ROWS};
