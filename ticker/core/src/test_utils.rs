//! Recording Host for Tests
//!
//! An in-memory element tree that implements [`Host`] and records every call
//! the ticker makes. Timers and frames never fire on their own; tests pull
//! them with [`RecordingHost::take_timer`] / [`RecordingHost::take_frame`] and
//! hand the resulting events to the ticker, which makes every interleaving
//! explicit.
//!
//! # Usage
//!
//! ```ignore
//! use ticker_core::test_utils::RecordingHost;
//!
//! let mut ticker = Ticker::new(config, RecordingHost::new())?;
//! ticker.initialize()?;
//!
//! let timer = ticker.host_mut().take_timer().unwrap();
//! ticker.handle_event(HostEvent::Timer(timer));
//! assert_eq!(ticker.host().displayed_text(), Some("first item"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use crate::host::{EventKind, FrameId, Host, HostEvent, NodeId, TimerId, Transform};
use crate::ticker::VIEWPORT_CLASS;

/// Id attribute of the container built by [`RecordingHost::new`]
pub const CONTAINER_ID: &str = "ticker";

/// Selector matching the container built by [`RecordingHost::new`]
pub const CONTAINER_SELECTOR: &str = "#ticker";

/// One element in the fake tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FakeNode {
    /// Parent element, `None` for roots
    pub parent: Option<NodeId>,
    /// `id` attribute
    pub element_id: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Text content
    pub text: String,
    /// Last transform set
    pub transform: Option<Transform>,
    /// Children in insertion order
    pub children: Vec<NodeId>,
}

/// A recorded [`Host`] call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    /// `create_element`
    CreateElement {
        /// Parent passed in
        parent: NodeId,
        /// Node handed back
        node: NodeId,
    },
    /// `remove_element`
    RemoveElement {
        /// Parent passed in
        parent: NodeId,
        /// Node removed
        node: NodeId,
    },
    /// `set_text`
    SetText {
        /// Target node
        node: NodeId,
        /// New text
        text: String,
    },
    /// `set_transform`
    SetTransform {
        /// Target node
        node: NodeId,
        /// New transform
        transform: Transform,
    },
    /// `listen`
    Listen(NodeId, EventKind),
    /// `unlisten`
    Unlisten(NodeId, EventKind),
    /// `set_timeout`
    SetTimeout(TimerId, Duration),
    /// `clear_timeout`
    ClearTimeout(TimerId),
    /// `request_animation_frame`
    RequestAnimationFrame(FrameId),
    /// `cancel_animation_frame`
    CancelAnimationFrame(FrameId),
}

/// In-memory host that records everything
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    nodes: BTreeMap<NodeId, FakeNode>,
    next_id: u64,
    timers: BTreeMap<TimerId, Duration>,
    frames: BTreeSet<FrameId>,
    listeners: HashSet<(NodeId, EventKind)>,
    calls: Vec<HostCall>,
    container: Option<NodeId>,
    viewport: Option<NodeId>,
}

impl RecordingHost {
    /// Host with a `#ticker` container holding a `js-ticker-inner` viewport
    pub fn new() -> Self {
        let mut host = Self::container_only();
        let container = host.container;
        host.viewport = Some(host.add_element(container, None, &[VIEWPORT_CLASS]));
        host
    }

    /// Host with a `#ticker` container but no viewport inside it
    pub fn container_only() -> Self {
        let mut host = Self::empty();
        host.container = Some(host.add_element(None, Some(CONTAINER_ID), &["ticker"]));
        host
    }

    /// Host with no elements at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert an element directly, bypassing the call log
    pub fn add_element(
        &mut self,
        parent: Option<NodeId>,
        element_id: Option<&str>,
        classes: &[&str],
    ) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            FakeNode {
                parent,
                element_id: element_id.map(String::from),
                classes: classes.iter().map(|c| (*c).to_string()).collect(),
                ..FakeNode::default()
            },
        );
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    /// The container built by the constructor
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// The viewport built by [`RecordingHost::new`]
    pub fn viewport(&self) -> Option<NodeId> {
        self.viewport
    }

    /// Look up a live element
    pub fn node(&self, id: NodeId) -> Option<&FakeNode> {
        self.nodes.get(&id)
    }

    /// Children of `id`, in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Ticker text elements currently inside the viewport
    pub fn text_nodes(&self) -> Vec<NodeId> {
        let Some(viewport) = self.viewport else {
            return Vec::new();
        };
        self.children(viewport)
            .iter()
            .copied()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| n.classes.iter().any(|c| c == "js-ticker-text"))
            })
            .collect()
    }

    /// Text of the single live ticker element
    pub fn displayed_text(&self) -> Option<&str> {
        let nodes = self.text_nodes();
        let node = nodes.first()?;
        self.nodes.get(node).map(|n| n.text.as_str())
    }

    /// Transform of the single live ticker element
    pub fn displayed_transform(&self) -> Option<Transform> {
        let nodes = self.text_nodes();
        self.nodes.get(nodes.first()?)?.transform
    }

    /// Whether `kind` events on `node` reach a listener
    pub fn is_listening(&self, node: NodeId, kind: EventKind) -> bool {
        self.listeners.contains(&(node, kind))
    }

    /// Whether anything listens for events at all
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Armed timers, oldest first
    pub fn pending_timers(&self) -> Vec<TimerId> {
        self.timers.keys().copied().collect()
    }

    /// Delay a timer was armed with
    pub fn timer_delay(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(&id).copied()
    }

    /// Fire the oldest armed timer (removes it)
    pub fn take_timer(&mut self) -> Option<TimerId> {
        let id = *self.timers.keys().next()?;
        self.timers.remove(&id);
        Some(id)
    }

    /// Requested frames, oldest first
    pub fn pending_frames(&self) -> Vec<FrameId> {
        self.frames.iter().copied().collect()
    }

    /// Deliver the oldest requested frame (removes it)
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.frames.pop_first()
    }

    /// Build a click event, or `None` if no listener would see it
    pub fn click(&self, target: NodeId) -> Option<HostEvent> {
        self.reaches_listener(target, EventKind::Click)
            .then_some(HostEvent::Click { target })
    }

    /// Build a transition-end event, or `None` if no listener would see it
    pub fn transition_end(&self, target: NodeId) -> Option<HostEvent> {
        self.reaches_listener(target, EventKind::TransitionEnd)
            .then_some(HostEvent::TransitionEnd { target })
    }

    /// Everything the ticker asked for, in order
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Walk from `target` up through its ancestors looking for a listener
    fn reaches_listener(&self, target: NodeId, kind: EventKind) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if self.listeners.contains(&(id, kind)) {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn matches(node: &FakeNode, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            node.element_id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            node.classes.iter().any(|c| c == class)
        } else {
            false
        }
    }

    fn is_descendant(&self, node: NodeId, root: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }
}

impl Host for RecordingHost {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| Self::matches(node, selector.trim()))
            .map(|(id, _)| *id)
    }

    fn query_descendant(&self, root: NodeId, class_name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(id, node)| {
                node.classes.iter().any(|c| c == class_name) && self.is_descendant(**id, root)
            })
            .map(|(id, _)| *id)
    }

    fn create_element(&mut self, parent: NodeId, class_names: &[&str]) -> NodeId {
        let node = self.add_element(Some(parent), None, class_names);
        self.calls.push(HostCall::CreateElement { parent, node });
        node
    }

    fn remove_element(&mut self, parent: NodeId, node: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != node);
        }
        self.nodes.remove(&node);
        self.listeners.retain(|(id, _)| *id != node);
        self.calls.push(HostCall::RemoveElement { parent, node });
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.text = text.to_string();
        }
        self.calls.push(HostCall::SetText {
            node,
            text: text.to_string(),
        });
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.transform = Some(transform);
        }
        self.calls.push(HostCall::SetTransform { node, transform });
    }

    fn listen(&mut self, node: NodeId, kind: EventKind) {
        self.listeners.insert((node, kind));
        self.calls.push(HostCall::Listen(node, kind));
    }

    fn unlisten(&mut self, node: NodeId, kind: EventKind) {
        self.listeners.remove(&(node, kind));
        self.calls.push(HostCall::Unlisten(node, kind));
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, delay);
        self.calls.push(HostCall::SetTimeout(id, delay));
        id
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
        self.calls.push(HostCall::ClearTimeout(timer));
    }

    fn request_animation_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.frames.insert(id);
        self.calls.push(HostCall::RequestAnimationFrame(id));
        id
    }

    fn cancel_animation_frame(&mut self, frame: FrameId) {
        self.frames.remove(&frame);
        self.calls.push(HostCall::CancelAnimationFrame(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_host_has_container_and_viewport() {
        let host = RecordingHost::new();

        let container = host.query_selector(CONTAINER_SELECTOR).unwrap();
        let viewport = host.query_descendant(container, VIEWPORT_CLASS).unwrap();

        assert_eq!(Some(container), host.container());
        assert_eq!(Some(viewport), host.viewport());
        assert!(host.query_selector(".ticker").is_some());
        assert!(host.query_selector("ticker").is_none());
    }

    #[test]
    fn test_events_bubble_to_listener() {
        let mut host = RecordingHost::new();
        let viewport = host.viewport().unwrap();
        let child = host.create_element(viewport, &["js-ticker-text"]);

        assert!(host.click(child).is_none());

        host.listen(viewport, EventKind::Click);

        assert_eq!(host.click(child), Some(HostEvent::Click { target: child }));
        assert!(host.transition_end(child).is_none());
    }

    #[test]
    fn test_timers_fire_oldest_first() {
        let mut host = RecordingHost::new();
        let first = host.set_timeout(Duration::from_millis(5));
        let second = host.set_timeout(Duration::from_millis(1));

        host.clear_timeout(first);

        assert_eq!(host.take_timer(), Some(second));
        assert_eq!(host.take_timer(), None);
    }
}
