//! Theme and Colors

use ratatui::style::Color;

// ============================================================================
// Ticker Palette
// ============================================================================

/// Ticker text
pub const TICKER_TEXT: Color = Color::Rgb(255, 223, 128);

/// Viewport border
pub const TICKER_BORDER: Color = Color::Rgb(150, 180, 255);

/// Viewport border while waiting for a click
pub const TICKER_BORDER_WAITING: Color = Color::Rgb(255, 150, 120);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);
