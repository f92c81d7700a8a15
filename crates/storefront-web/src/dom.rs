//! Browser side effects of an open cart panel

use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent, Node};

use storefront_core::{Bounds, OpenEffects, PanelEvent, PanelState, Point};

/// Hides page scrolling until dropped
pub struct ScrollLock {
    body: Option<HtmlElement>,
}

impl ScrollLock {
    pub fn acquire() -> Self {
        let body = document().body();
        if let Some(body) = &body {
            let _ = body.style().set_property("overflow", "hidden");
        }
        Self { body }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        if let Some(body) = &self.body {
            let _ = body.style().set_property("overflow", "auto");
        }
    }
}

/// A document-level listener, removed when dropped
pub struct DocumentListener {
    event: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

impl DocumentListener {
    pub fn mousedown(handler: impl FnMut(MouseEvent) + 'static) -> Self {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        let _ = document()
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        Self {
            event: "mousedown",
            closure,
        }
    }
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        let _ = document()
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Everything registered for one Open period
pub struct OpenGuard {
    _scroll: ScrollLock,
    _listener: DocumentListener,
}

/// Scroll lock and outside-press detection for the cart panel
#[derive(Clone, Copy)]
pub struct DomEffects {
    state: RwSignal<PanelState>,
    panel: NodeRef<html::Div>,
    toggle: NodeRef<html::Button>,
}

impl DomEffects {
    pub fn new(
        state: RwSignal<PanelState>,
        panel: NodeRef<html::Div>,
        toggle: NodeRef<html::Button>,
    ) -> Self {
        Self { state, panel, toggle }
    }
}

impl OpenEffects for DomEffects {
    type Guard = OpenGuard;

    fn acquire(&self) -> OpenGuard {
        let Self { state, panel, toggle } = *self;

        let listener = DocumentListener::mousedown(move |ev| {
            let Some(panel_el) = panel.get_untracked() else {
                return;
            };

            // The toggle handles its own presses
            let target = ev.target().and_then(|t| t.dyn_into::<Node>().ok());
            let contains_target = target.map(|node| {
                panel_el.contains(Some(&node))
                    || toggle
                        .get_untracked()
                        .is_some_and(|button| button.contains(Some(&node)))
            });

            let point = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
            let event = PanelEvent::press(contains_target, bounds_of(&panel_el), point);
            state.update(|s| *s = s.next(event));
        });

        OpenGuard {
            _scroll: ScrollLock::acquire(),
            _listener: listener,
        }
    }
}
