//! TickerView Widget
//!
//! Renders the stage's viewport: a bordered box whose inner rows act as the
//! clipping window. Each text element is drawn on the row its current slide
//! offset maps to; rows outside the window are clipped, which is what makes
//! an element parked at the start offset invisible.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};
use unicode_width::UnicodeWidthStr;

use ticker_core::NodeId;

use crate::stage::Stage;

/// Inner height of the viewport in rows
pub const VIEWPORT_ROWS: u16 = 3;

/// Widest the container gets
const MAX_CONTAINER_WIDTH: u16 = 64;

/// Centered container box for a terminal of size `area`
pub fn container_rect(area: Rect) -> Rect {
    let width = area.width.min(MAX_CONTAINER_WIDTH);
    let height = (VIEWPORT_ROWS + 2).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Maps slide offsets to terminal rows inside the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickerLayout {
    /// Inner (clipping) area of the viewport
    pub viewport: Rect,
    /// How many pixels of offset make one terminal row
    pub px_per_row: u16,
}

impl TickerLayout {
    /// Layout for a container drawn at `container`
    pub fn new(container: Rect, px_per_row: u16) -> Self {
        Self {
            viewport: Block::bordered().inner(container),
            px_per_row: px_per_row.max(1),
        }
    }

    /// Resting row for a revealed element
    pub fn center_row(&self) -> u16 {
        self.viewport.y + self.viewport.height / 2
    }

    /// Row for an element at `offset_px`, or `None` if clipped
    pub fn row_for(&self, offset_px: f32) -> Option<u16> {
        if self.viewport.height == 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let rows = (offset_px / f32::from(self.px_per_row)).round() as i32;
        let row = i32::from(self.center_row()) + rows;
        let top = i32::from(self.viewport.y);
        let bottom = top + i32::from(self.viewport.height);
        (top..bottom)
            .contains(&row)
            .then(|| u16::try_from(row).ok())
            .flatten()
    }

    /// Whether a cell lies inside the viewport
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.viewport.x
            && x < self.viewport.x + self.viewport.width
            && y >= self.viewport.y
            && y < self.viewport.y + self.viewport.height
    }

    /// Element under a cell: the topmost text element drawn on that row, else
    /// the viewport itself. `None` outside the viewport.
    pub fn hit_test(&self, stage: &Stage, x: u16, y: u16) -> Option<NodeId> {
        if !self.contains(x, y) {
            return None;
        }
        let viewport = stage.viewport();
        let on_row = stage.children(viewport).iter().rev().find(|child| {
            stage
                .offset_px(**child)
                .and_then(|offset| self.row_for(offset))
                == Some(y)
        });
        Some(on_row.copied().unwrap_or(viewport))
    }
}

/// Renders the ticker viewport from a [`Stage`]
pub struct TickerView<'a> {
    stage: &'a Stage,
    px_per_row: u16,
    title: Option<&'a str>,
    text_style: Style,
    border_style: Style,
}

impl<'a> TickerView<'a> {
    /// Create a view of `stage`, mapping `px_per_row` pixels of offset to a row
    pub fn new(stage: &'a Stage, px_per_row: u16) -> Self {
        Self {
            stage,
            px_per_row,
            title: None,
            text_style: Style::default(),
            border_style: Style::default(),
        }
    }

    /// Set the border title
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the style for ticker text
    pub fn text_style(mut self, style: Style) -> Self {
        self.text_style = style;
        self
    }

    /// Set the border style
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }
}

impl Widget for TickerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered().border_style(self.border_style);
        if let Some(title) = self.title {
            block = block.title(title);
        }
        block.render(area, buf);

        let layout = TickerLayout::new(area, self.px_per_row);
        let inner = layout.viewport;
        let viewport = self.stage.viewport();

        for &child in self.stage.children(viewport) {
            let Some(element) = self.stage.element(child) else {
                continue;
            };
            let Some(row) = self
                .stage
                .offset_px(child)
                .and_then(|offset| layout.row_for(offset))
            else {
                continue;
            };

            let text = element.text();
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(inner.width);
            let x = inner.x + (inner.width - width) / 2;
            buf.set_stringn(x, row, text, usize::from(inner.width), self.text_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_rect_is_centered() {
        let rect = container_rect(Rect::new(0, 0, 100, 21));
        assert_eq!(rect, Rect::new(18, 8, 64, 5));

        let small = container_rect(Rect::new(0, 0, 20, 3));
        assert_eq!(small, Rect::new(0, 0, 20, 3));
    }

    #[test]
    fn test_row_mapping_clips_outside_viewport() {
        let layout = TickerLayout::new(Rect::new(0, 0, 20, 5), 10);

        assert_eq!(layout.viewport, Rect::new(1, 1, 18, 3));
        assert_eq!(layout.row_for(0.0), Some(2));
        assert_eq!(layout.row_for(-10.0), Some(1));
        assert_eq!(layout.row_for(12.0), Some(3));
        assert_eq!(layout.row_for(30.0), None);
        assert_eq!(layout.row_for(-30.0), None);
    }

    #[test]
    fn test_contains() {
        let layout = TickerLayout::new(Rect::new(0, 0, 20, 5), 10);

        assert!(layout.contains(1, 1));
        assert!(layout.contains(18, 3));
        assert!(!layout.contains(0, 2));
        assert!(!layout.contains(19, 2));
        assert!(!layout.contains(5, 4));
    }
}
