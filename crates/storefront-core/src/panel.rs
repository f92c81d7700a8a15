//! Cart Panel
//!
//! Two-state dropdown (`Closed` / `Open`). While open, page-level side effects
//! (scroll lock, outside-click listener) are held as a guard obtained from
//! [`OpenEffects::acquire`]. Leaving `Open`, or dropping the panel, drops the
//! guard and releases them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// User interactions the panel reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// The cart button in the navbar
    Toggle,
    /// Pointer pressed somewhere on the page
    PointerDown { inside: bool },
    /// The close (X) control in the panel header
    CloseButton,
    /// The mobile backdrop behind the panel
    Backdrop,
}

impl PanelEvent {
    /// Pointer press classified against the panel's bounding box
    pub fn pointer(bounds: Bounds, point: Point) -> Self {
        PanelEvent::PointerDown {
            inside: bounds.contains(point),
        }
    }

    /// Pointer press classified by whether the panel contains the pressed
    /// element. The bounding box only decides when there is no target.
    pub fn press(contains_target: Option<bool>, bounds: Bounds, point: Point) -> Self {
        match contains_target {
            Some(inside) => PanelEvent::PointerDown { inside },
            None => Self::pointer(bounds, point),
        }
    }
}

impl PanelState {
    /// Transition table
    pub fn next(self, event: PanelEvent) -> Self {
        match (self, event) {
            (PanelState::Closed, PanelEvent::Toggle) => PanelState::Open,
            (PanelState::Open, PanelEvent::PointerDown { inside: true }) => PanelState::Open,
            _ => PanelState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == PanelState::Open
    }
}

/// Viewport position of a pointer event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of the panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Edges count as inside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// Side effects that exist only while the panel is open
pub trait OpenEffects {
    /// Released when dropped
    type Guard;

    /// Register the effects for one Open period
    fn acquire(&self) -> Self::Guard;
}

/// Panel state plus the guard for the current Open period
pub struct CartPanel<E: OpenEffects> {
    state: PanelState,
    effects: E,
    guard: Option<E::Guard>,
}

impl<E: OpenEffects> CartPanel<E> {
    /// Starts closed with nothing acquired
    pub fn new(effects: E) -> Self {
        Self {
            state: PanelState::Closed,
            effects,
            guard: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Apply an event and return the resulting state
    pub fn dispatch(&mut self, event: PanelEvent) -> PanelState {
        let next = self.state.next(event);
        self.sync(next);
        next
    }

    /// Pointer press at `point` with the panel occupying `bounds`
    pub fn pointer_down(&mut self, bounds: Bounds, point: Point) -> PanelState {
        self.dispatch(PanelEvent::pointer(bounds, point))
    }

    /// Move to `state`, acquiring or releasing the open effects as needed
    pub fn sync(&mut self, state: PanelState) {
        match state {
            PanelState::Open if self.guard.is_none() => {
                tracing::debug!("Cart panel opened");
                self.guard = Some(self.effects.acquire());
            }
            PanelState::Closed if self.guard.is_some() => {
                tracing::debug!("Cart panel closed");
                self.guard = None;
            }
            _ => {}
        }
        self.state = state;
    }

    /// Release the open effects regardless of state
    pub fn teardown(&mut self) {
        self.sync(PanelState::Closed);
    }
}
