//! Terminal Stage
//!
//! An in-memory element tree with its own clock that implements the ticker's
//! [`Host`] contract for the terminal. The app loop calls [`Stage::poll`] once
//! per frame; the stage advances slides, collects due timers, finished
//! transitions and frame callbacks, and hands them back as [`HostEvent`]s.
//!
//! Events produced by one poll are a snapshot: anything the ticker schedules
//! while handling them (a new timer, a frame request) is picked up by a later
//! poll, the same way a browser defers `requestAnimationFrame` callbacks to
//! the next frame.

mod motion;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::{Duration, Instant};

use ticker_core::{
    EventKind, FrameId, Host, HostEvent, NodeId, TimerId, Transform, VIEWPORT_CLASS,
};

pub use motion::{EasingFunction, Slide};

/// `id` attribute of the container the stage is built with
pub const CONTAINER_ID: &str = "ticker";

/// Selector matching the container the stage is built with
pub const CONTAINER_SELECTOR: &str = "#ticker";

/// One element on the stage
#[derive(Clone, Debug, Default)]
pub struct Element {
    parent: Option<NodeId>,
    element_id: Option<String>,
    classes: Vec<String>,
    text: String,
    children: Vec<NodeId>,
    slide: Option<Slide>,
}

impl Element {
    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Class list
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent element
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Terminal host: element tree, timers, frame requests and a clock
#[derive(Debug)]
pub struct Stage {
    nodes: BTreeMap<NodeId, Element>,
    next_id: u64,
    timers: BTreeMap<TimerId, Instant>,
    frames: BTreeSet<FrameId>,
    listeners: HashSet<(NodeId, EventKind)>,
    /// Length of every slide (the stylesheet's transition duration)
    transition: Duration,
    easing: EasingFunction,
    now: Instant,
    container: NodeId,
    viewport: NodeId,
}

impl Stage {
    /// Stage with a `#ticker` container and a viewport, clock starting now
    pub fn new(transition: Duration) -> Self {
        Self::new_at(Instant::now(), transition)
    }

    /// Stage with a `#ticker` container and a viewport, clock starting at `now`
    pub fn new_at(now: Instant, transition: Duration) -> Self {
        let mut stage = Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            timers: BTreeMap::new(),
            frames: BTreeSet::new(),
            listeners: HashSet::new(),
            transition,
            easing: EasingFunction::default(),
            now,
            container: NodeId(0),
            viewport: NodeId(0),
        };
        stage.container = stage.insert(None, Some(CONTAINER_ID), &["ticker"]);
        stage.viewport = stage.insert(Some(stage.container), None, &[VIEWPORT_CLASS]);
        stage
    }

    /// Use a different easing curve for subsequent slides
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Advance the clock and collect everything that became due
    ///
    /// Order within one poll: finished transitions, then frame callbacks, then
    /// timers by deadline.
    pub fn poll(&mut self, now: Instant) -> Vec<HostEvent> {
        self.now = now.max(self.now);
        let mut events = Vec::new();

        let finished: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, el)| el.slide.is_some_and(|s| s.just_finished(self.now)))
            .map(|(id, _)| *id)
            .collect();
        for id in finished {
            if let Some(slide) = self.nodes.get_mut(&id).and_then(|el| el.slide.as_mut()) {
                slide.settle();
            }
            if self.reaches_listener(id, EventKind::TransitionEnd) {
                events.push(HostEvent::TransitionEnd { target: id });
            }
        }

        events.extend(
            std::mem::take(&mut self.frames)
                .into_iter()
                .map(HostEvent::AnimationFrame),
        );

        let mut due: Vec<(Instant, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in due {
            self.timers.remove(&id);
            events.push(HostEvent::Timer(id));
        }

        if !events.is_empty() {
            tracing::trace!(count = events.len(), "Stage events due");
        }
        events
    }

    /// Build a click on `target`, or `None` if nothing listens for it
    pub fn click(&self, target: NodeId) -> Option<HostEvent> {
        self.reaches_listener(target, EventKind::Click)
            .then_some(HostEvent::Click { target })
    }

    /// The stage clock
    pub fn now(&self) -> Instant {
        self.now
    }

    /// The container element
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The viewport element
    pub fn viewport(&self) -> NodeId {
        self.viewport
    }

    /// Look up an element
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(&id)
    }

    /// Children of `id`, in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |el| el.children.as_slice())
    }

    /// Rendered vertical offset of `id` at the stage clock
    pub fn offset_px(&self, id: NodeId) -> Option<f32> {
        let slide = self.nodes.get(&id)?.slide?;
        Some(slide.offset_at(self.now))
    }

    /// Whether `id` is mid-slide
    pub fn is_moving(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .and_then(|el| el.slide)
            .is_some_and(|s| s.is_moving())
    }

    /// Number of armed timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether anything is scheduled or animating
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
            && self.frames.is_empty()
            && !self.nodes.values().any(|el| el.slide.is_some_and(|s| s.is_moving()))
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        element_id: Option<&str>,
        classes: &[&str],
    ) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            Element {
                parent,
                element_id: element_id.map(String::from),
                classes: classes.iter().map(|c| (*c).to_string()).collect(),
                ..Element::default()
            },
        );
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    fn reaches_listener(&self, target: NodeId, kind: EventKind) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if self.listeners.contains(&(id, kind)) {
                return true;
            }
            current = self.nodes.get(&id).and_then(|el| el.parent);
        }
        false
    }

    fn is_descendant(&self, node: NodeId, root: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|el| el.parent);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(&id).and_then(|el| el.parent);
        }
        false
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(el) = self.nodes.remove(&id) {
            for child in el.children {
                self.remove_subtree(child);
            }
        }
        self.listeners.retain(|(node, _)| *node != id);
    }
}

impl Host for Stage {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        self.nodes
            .iter()
            .find(|(_, el)| {
                if let Some(id) = selector.strip_prefix('#') {
                    el.element_id.as_deref() == Some(id)
                } else if let Some(class) = selector.strip_prefix('.') {
                    el.classes.iter().any(|c| c == class)
                } else {
                    false
                }
            })
            .map(|(id, _)| *id)
    }

    fn query_descendant(&self, root: NodeId, class_name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(id, el)| {
                el.classes.iter().any(|c| c == class_name) && self.is_descendant(**id, root)
            })
            .map(|(id, _)| *id)
    }

    fn create_element(&mut self, parent: NodeId, class_names: &[&str]) -> NodeId {
        self.insert(Some(parent), None, class_names)
    }

    fn remove_element(&mut self, parent: NodeId, node: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != node);
        }
        self.remove_subtree(node);
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.nodes.get_mut(&node) {
            el.text = text.to_string();
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        let (now, duration, easing) = (self.now, self.transition, self.easing);
        let Some(el) = self.nodes.get_mut(&node) else {
            return;
        };
        #[allow(clippy::cast_precision_loss)]
        let target = transform.y_px as f32;

        // A node's first transform is its starting style, not a transition
        el.slide = Some(match el.slide {
            None => Slide::placed(target, now),
            Some(current) => current.retarget(target, now, duration, easing),
        });
    }

    fn listen(&mut self, node: NodeId, kind: EventKind) {
        self.listeners.insert((node, kind));
    }

    fn unlisten(&mut self, node: NodeId, kind: EventKind) {
        self.listeners.remove(&(node, kind));
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, self.now + delay);
        id
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn request_animation_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.frames.insert(id);
        id
    }

    fn cancel_animation_frame(&mut self, frame: FrameId) {
        self.frames.remove(&frame);
    }
}
