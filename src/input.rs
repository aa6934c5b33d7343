//! Pointer, wheel and resize input, decoupled from the browser.
//!
//! The web layer translates mouse/touch/wheel events into [`InputEvent`]s and
//! forwards them to every subscriber. Tests drive the same handlers through
//! [`ManualInput`].

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button or first touch went down, in client coordinates.
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { dx: f64, dy: f64 },
    Resize,
}

/// What the source should do with the native event afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    PreventDefault,
}

impl Propagation {
    /// Combine two answers; any `PreventDefault` wins.
    pub fn and(self, other: Propagation) -> Propagation {
        match (self, other) {
            (Propagation::Continue, Propagation::Continue) => Propagation::Continue,
            _ => Propagation::PreventDefault,
        }
    }
}

pub type InputHandler = Rc<dyn Fn(&InputEvent) -> Propagation>;

pub trait InputSource {
    fn subscribe(&self, handler: InputHandler);
}

/// In-memory input source.
#[derive(Default)]
pub struct ManualInput {
    handlers: RefCell<Vec<InputHandler>>,
}

impl ManualInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: InputEvent) -> Propagation {
        let handlers = self.handlers.borrow().clone();
        handlers
            .iter()
            .fold(Propagation::Continue, |acc, handler| acc.and(handler(&event)))
    }
}

impl InputSource for ManualInput {
    fn subscribe(&self, handler: InputHandler) {
        self.handlers.borrow_mut().push(handler);
    }
}
