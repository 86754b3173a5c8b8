//! Ticker Controller
//!
//! Drives one display element through the reveal/hide cycle. The controller
//! reacts to [`HostEvent`]s only; it never waits or sleeps. Every phase change
//! follows the same loop:
//!
//! ```text
//! timer ─▶ decide phase ─▶ set_transform ─▶ (host animates) ─▶ TransitionEnd
//!   ▲                                                              │
//!   └──── set_timeout ◀──── AnimationFrame ◀── request_animation_frame
//! ```
//!
//! Timers are single-shot and re-armed after each step, so phases strictly
//! alternate even when the host runs slow.

use tracing::{debug, info, trace, warn};

use crate::config::{InteractionMode, TickerConfig};
use crate::error::TickerError;
use crate::host::{EventKind, FrameId, Host, HostEvent, NodeId, TimerId, Transform};
use crate::state::{Phase, TickerState};

/// Class used to locate the viewport inside the container
pub const VIEWPORT_CLASS: &str = "js-ticker-inner";

/// Classes given to every display element
pub const TEXT_CLASS_NAMES: [&str; 2] = ["ticker-text", "js-ticker-text"];

/// Resting position of a revealed element
const VISIBLE_POSITION: Transform = Transform::translate_y(0);

/// Rotating text ticker bound to a host environment
#[derive(Debug)]
pub struct Ticker<H: Host> {
    config: TickerConfig,
    host: H,
    /// Viewport element, resolved by `initialize`
    viewport: Option<NodeId>,
    /// Present between `initialize` and `shutdown`
    state: Option<TickerState>,
    pending_timer: Option<TimerId>,
    pending_frame: Option<FrameId>,
}

impl<H: Host> Ticker<H> {
    /// Create a ticker; nothing touches the host until [`initialize`](Self::initialize)
    ///
    /// # Errors
    ///
    /// Returns a validation error if `items` is empty or the selector is blank.
    pub fn new(config: TickerConfig, host: H) -> Result<Self, TickerError> {
        config.validate()?;

        Ok(Self {
            config,
            host,
            viewport: None,
            state: None,
            pending_timer: None,
            pending_frame: None,
        })
    }

    /// Resolve elements, subscribe to events, create the display element and
    /// arm the first timer
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::ElementNotFound`] if the container or its
    /// viewport is missing (the host is left untouched), or
    /// [`TickerError::AlreadyInitialized`] on a second call.
    pub fn initialize(&mut self) -> Result<(), TickerError> {
        if self.state.is_some() {
            return Err(TickerError::AlreadyInitialized);
        }

        let selector = &self.config.container_selector;
        let container =
            self.host
                .query_selector(selector)
                .ok_or_else(|| TickerError::ElementNotFound {
                    selector: selector.clone(),
                })?;
        let viewport = self
            .host
            .query_descendant(container, VIEWPORT_CLASS)
            .ok_or_else(|| TickerError::ElementNotFound {
                selector: format!("{selector} .{VIEWPORT_CLASS}"),
            })?;

        if self.config.interaction_mode == InteractionMode::Click {
            self.host.listen(viewport, EventKind::Click);
        }
        self.host.listen(viewport, EventKind::TransitionEnd);

        let display_node = self.create_display_node(viewport);
        self.viewport = Some(viewport);
        self.state = Some(TickerState::new(self.config.items.clone(), display_node));
        self.arm_timer();

        info!(
            selector = %self.config.container_selector,
            items = self.config.items.len(),
            mode = %self.config.interaction_mode,
            duration_ms = self.config.transition_duration_ms,
            "Ticker initialized"
        );
        Ok(())
    }

    /// Deliver one host notification
    pub fn handle_event(&mut self, event: HostEvent) {
        if self.state.is_none() {
            trace!(?event, "Ignoring event for inactive ticker");
            return;
        }

        match event {
            HostEvent::Timer(id) => self.on_timer(id),
            HostEvent::AnimationFrame(id) => self.on_animation_frame(id),
            HostEvent::TransitionEnd { target } => self.on_transition_finished(target),
            HostEvent::Click { target } => self.on_user_click(target),
        }
    }

    /// Tear down: cancel pending callbacks, unsubscribe and remove the display
    /// element. Safe to call more than once.
    pub fn shutdown(&mut self) {
        let (Some(state), Some(viewport)) = (self.state.take(), self.viewport.take()) else {
            return;
        };

        if let Some(timer) = self.pending_timer.take() {
            self.host.clear_timeout(timer);
        }
        if let Some(frame) = self.pending_frame.take() {
            self.host.cancel_animation_frame(frame);
        }
        if self.config.interaction_mode == InteractionMode::Click {
            self.host.unlisten(viewport, EventKind::Click);
        }
        self.host.unlisten(viewport, EventKind::TransitionEnd);
        self.host.remove_element(viewport, state.display_node);

        info!("Ticker shut down");
    }

    /// Current state, if initialized
    pub fn state(&self) -> Option<&TickerState> {
        self.state.as_ref()
    }

    /// Current phase, if initialized
    pub fn phase(&self) -> Option<Phase> {
        self.state.as_ref().map(TickerState::phase)
    }

    /// Whether `initialize` has succeeded and `shutdown` has not run
    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// The configuration this ticker was built from
    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// The viewport element, if initialized
    pub fn viewport(&self) -> Option<NodeId> {
        self.viewport
    }

    /// Shared access to the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Exclusive access to the host (hosts poll themselves through this)
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    fn on_timer(&mut self, id: TimerId) {
        if self.pending_timer != Some(id) {
            trace!(?id, "Ignoring stale timer");
            return;
        }
        self.pending_timer = None;
        self.decide_phase();
    }

    fn on_animation_frame(&mut self, id: FrameId) {
        if self.pending_frame != Some(id) {
            trace!(?id, "Ignoring stale animation frame");
            return;
        }
        self.pending_frame = None;
        self.arm_timer();
    }

    fn on_transition_finished(&mut self, target: NodeId) {
        if !self.owns(target) {
            trace!(?target, "Ignoring transition from foreign element");
            return;
        }
        let Some(viewport) = self.viewport else {
            return;
        };
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let phase = state.phase;

        match phase {
            Phase::Revealing => {
                state.phase = Phase::Visible;
                debug!(cursor = state.cursor, "Item revealed");
            }
            Phase::Hiding => {
                let stale = state.display_node;
                state.phase = Phase::Hidden;
                self.host.remove_element(viewport, stale);
                let fresh = self.create_display_node(viewport);
                if let Some(state) = self.state.as_mut() {
                    state.display_node = fresh;
                }
                debug!(?stale, ?fresh, "Item hidden, display element recreated");
            }
            Phase::Hidden | Phase::Visible | Phase::WaitingForClick => {
                warn!(?phase, "Transition finished with no transition in flight");
                return;
            }
        }

        if let Some(frame) = self.pending_frame.take() {
            self.host.cancel_animation_frame(frame);
        }
        self.pending_frame = Some(self.host.request_animation_frame());
    }

    fn on_user_click(&mut self, target: NodeId) {
        if self.config.interaction_mode != InteractionMode::Click {
            return;
        }
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if state.animating() {
            trace!("Ignoring click during transition");
            return;
        }
        if !self.owns(target) {
            trace!(?target, "Ignoring click from foreign element");
            return;
        }
        if !state.visible() {
            trace!("Ignoring click with nothing visible");
            return;
        }

        // A reveal's follow-up frame would otherwise arm a timer mid-hide
        if let Some(frame) = self.pending_frame.take() {
            self.host.cancel_animation_frame(frame);
        }
        if let Some(timer) = self.pending_timer.take() {
            self.host.clear_timeout(timer);
        }
        if let Some(state) = self.state.as_mut() {
            state.click_activated = true;
        }
        debug!("Item dismissed by click");
        self.hide_current();
    }

    // =========================================================================
    // Phase logic
    // =========================================================================

    fn decide_phase(&mut self) {
        let click_mode = self.config.interaction_mode == InteractionMode::Click;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let phase = state.phase;

        match phase {
            Phase::Visible | Phase::WaitingForClick if click_mode && !state.click_activated => {
                state.phase = Phase::WaitingForClick;
                trace!("Waiting for click");
                self.arm_timer();
            }
            Phase::Visible | Phase::WaitingForClick => self.hide_current(),
            Phase::Hidden => self.reveal_current(),
            Phase::Revealing | Phase::Hiding => warn!(?phase, "Timer fired during a transition"),
        }
    }

    fn reveal_current(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let node = state.display_node;
        let cursor = state.cursor;
        let text = state.advance().to_string();
        state.click_activated = false;
        state.phase = Phase::Revealing;

        self.host.set_text(node, &text);
        self.host.set_transform(node, VISIBLE_POSITION);
        debug!(cursor, text = %text, "Revealing item");
    }

    fn hide_current(&mut self) {
        let exit = self.exit_position();
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let node = state.display_node;
        state.phase = Phase::Hiding;

        self.host.set_transform(node, exit);
        debug!("Hiding item");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn create_display_node(&mut self, viewport: NodeId) -> NodeId {
        let start = self.start_position();
        let node = self.host.create_element(viewport, &TEXT_CLASS_NAMES);
        self.host.set_transform(node, start);
        node
    }

    fn arm_timer(&mut self) {
        if let Some(stale) = self.pending_timer.take() {
            self.host.clear_timeout(stale);
        }
        let delay = self.config.transition_duration();
        self.pending_timer = Some(self.host.set_timeout(delay));
    }

    fn owns(&self, target: NodeId) -> bool {
        Some(target) == self.viewport
            || self
                .state
                .as_ref()
                .is_some_and(|state| state.display_node == target)
    }

    fn start_position(&self) -> Transform {
        Transform::translate_y(self.config.start_offset_px)
    }

    fn exit_position(&self) -> Transform {
        Transform::translate_y(self.config.start_offset_px.saturating_neg())
    }
}
