//! Host Contract
//!
//! The ticker never touches a rendering surface directly. Everything it needs
//! from its environment (element lookup, style mutation, listeners, timers and
//! animation frames) goes through the [`Host`] trait, and everything the
//! environment reports back arrives as a [`HostEvent`].
//!
//! # Event Flow
//!
//! ```text
//! Ticker ──set_transform / set_timeout / request_animation_frame──▶ Host
//!   ▲                                                                │
//!   └─────────────── handle_event(HostEvent::{Timer, ..}) ───────────┘
//! ```
//!
//! A host must deliver events one at a time; the ticker takes `&mut self` for
//! every event so two handlers can never overlap.

use std::fmt;
use std::time::Duration;

/// Handle to an element owned by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle to a pending single-shot timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to a pending animation frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Kinds of element events the ticker subscribes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer click
    Click,
    /// A style transition on the element (or a descendant) finished
    TransitionEnd,
}

/// Notifications delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A timer armed with [`Host::set_timeout`] elapsed
    Timer(TimerId),
    /// A frame requested with [`Host::request_animation_frame`] is being drawn
    AnimationFrame(FrameId),
    /// A transform transition completed on `target`
    TransitionEnd {
        /// Element the transition ran on
        target: NodeId,
    },
    /// The user clicked `target`
    Click {
        /// Innermost element under the pointer
        target: NodeId,
    },
}

/// Vertical slide transform
///
/// Renders as `translate3d(0, <y>px, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Transform {
    /// Vertical offset in pixels (positive = down)
    pub y_px: i32,
}

impl Transform {
    /// Transform placing an element `y_px` pixels from its resting position
    #[must_use]
    pub const fn translate_y(y_px: i32) -> Self {
        Self { y_px }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate3d(0, {}px, 0)", self.y_px)
    }
}

/// Services a host environment provides to the ticker
///
/// All mutations are assumed to succeed. Lookups return `None` when nothing
/// matches.
pub trait Host {
    /// Find the first element matching `selector` (`#id` or `.class`)
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Find the first descendant of `root` carrying `class_name`
    fn query_descendant(&self, root: NodeId, class_name: &str) -> Option<NodeId>;

    /// Create an element with the given classes and append it to `parent`
    fn create_element(&mut self, parent: NodeId, class_names: &[&str]) -> NodeId;

    /// Detach `node` from `parent` and discard it
    fn remove_element(&mut self, parent: NodeId, node: NodeId);

    /// Replace the text content of `node`
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Set the transform of `node`; the host animates towards it
    fn set_transform(&mut self, node: NodeId, transform: Transform);

    /// Start delivering `kind` events targeted at `node` or its descendants
    fn listen(&mut self, node: NodeId, kind: EventKind);

    /// Stop delivering `kind` events for `node`
    fn unlisten(&mut self, node: NodeId, kind: EventKind);

    /// Arm a single-shot timer
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Disarm a timer; unknown or fired ids are ignored
    fn clear_timeout(&mut self, timer: TimerId);

    /// Ask for a callback before the next frame is drawn
    fn request_animation_frame(&mut self) -> FrameId;

    /// Withdraw a frame request; unknown or delivered ids are ignored
    fn cancel_animation_frame(&mut self, frame: FrameId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_renders_translate3d() {
        assert_eq!(Transform::translate_y(30).to_string(), "translate3d(0, 30px, 0)");
        assert_eq!(Transform::translate_y(-30).to_string(), "translate3d(0, -30px, 0)");
        assert_eq!(Transform::default().to_string(), "translate3d(0, 0px, 0)");
    }
}
