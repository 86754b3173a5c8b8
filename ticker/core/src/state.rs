//! Ticker State Machine
//!
//! ```text
//!            timer                 transition-end
//!   Hidden ─────────▶ Revealing ─────────────────▶ Visible
//!     ▲                                            │   │
//!     │ transition-end      timer (auto) / click   │   │ timer (click mode,
//!     └────────────── Hiding ◀─────────────────────┘   │  not yet clicked)
//!                        ▲                             ▼
//!                        └────────── click ──── WaitingForClick
//! ```

use crate::host::NodeId;

/// Where the display element is in its show/hide cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// Parked at the start offset, nothing shown
    #[default]
    Hidden,
    /// Sliding into view
    Revealing,
    /// Resting in view
    Visible,
    /// Sliding out of view
    Hiding,
    /// Resting in view until the user clicks (click mode)
    WaitingForClick,
}

impl Phase {
    /// Whether the element is (or is heading to) the in-view position
    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Revealing | Self::Visible | Self::WaitingForClick)
    }

    /// Whether a transition is in flight
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Revealing | Self::Hiding)
    }
}

/// Mutable state of an initialized ticker
#[derive(Clone, Debug)]
pub struct TickerState {
    pub(crate) items: Vec<String>,
    pub(crate) cursor: usize,
    pub(crate) phase: Phase,
    pub(crate) click_activated: bool,
    pub(crate) display_node: NodeId,
}

impl TickerState {
    pub(crate) fn new(items: Vec<String>, display_node: NodeId) -> Self {
        Self {
            items,
            cursor: 0,
            phase: Phase::Hidden,
            click_activated: false,
            display_node,
        }
    }

    /// Rotation content
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the next item to reveal
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the element is in (or heading to) the in-view position
    pub fn visible(&self) -> bool {
        self.phase.is_visible()
    }

    /// Whether a transition is in flight
    pub fn animating(&self) -> bool {
        self.phase.is_animating()
    }

    /// Whether the user dismissed the current item
    pub fn click_activated(&self) -> bool {
        self.click_activated
    }

    /// The live display element
    pub fn display_node(&self) -> NodeId {
        self.display_node
    }

    /// Take the next item and advance the cursor
    pub(crate) fn advance(&mut self) -> &str {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[index]
    }
}
