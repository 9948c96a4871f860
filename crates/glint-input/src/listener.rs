//! Input listeners: capability records of optional callbacks.
//!
//! A listener implements any subset of the recognized handlers. Identity
//! is `Rc` pointer identity, so the same listener value can be looked up
//! for removal without any registration keys.

use crate::types::InputEvent;
use std::rc::Rc;

type EventCallback = Rc<dyn Fn(&InputEvent)>;
type PlainCallback = Rc<dyn Fn()>;

/// A pointer-input listener.
///
/// Built through [`InputListener::builder`]. Every handler is optional;
/// a listener registered with `attach = true` must define `interrupt`.
#[derive(Default)]
pub struct InputListener {
    pub(crate) enter: Option<EventCallback>,
    pub(crate) over: Option<EventCallback>,
    pub(crate) move_: Option<EventCallback>,
    pub(crate) exit: Option<EventCallback>,
    pub(crate) down: Option<EventCallback>,
    pub(crate) up: Option<EventCallback>,
    pub(crate) cancel: Option<EventCallback>,
    pub(crate) interrupt: Option<PlainCallback>,
    // Terminating events for the synthesized keyboard-drag pointer.
    pub(crate) keyup: Option<PlainCallback>,
    pub(crate) blur: Option<PlainCallback>,
}

impl InputListener {
    pub fn builder() -> InputListenerBuilder {
        InputListenerBuilder::default()
    }

    /// Whether this listener can be the target of an interrupt. Required
    /// for attachment.
    pub fn has_interrupt(&self) -> bool {
        self.interrupt.is_some()
    }

    pub(crate) fn notify_interrupt(&self) {
        if let Some(interrupt) = &self.interrupt {
            interrupt();
        }
    }
}

/// Builder for [`InputListener`].
#[derive(Default)]
pub struct InputListenerBuilder {
    listener: InputListener,
}

impl InputListenerBuilder {
    pub fn on_enter(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.enter = Some(Rc::new(callback));
        self
    }

    pub fn on_over(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.over = Some(Rc::new(callback));
        self
    }

    pub fn on_move(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.move_ = Some(Rc::new(callback));
        self
    }

    pub fn on_exit(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.exit = Some(Rc::new(callback));
        self
    }

    pub fn on_down(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.down = Some(Rc::new(callback));
        self
    }

    pub fn on_up(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.up = Some(Rc::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl Fn(&InputEvent) + 'static) -> Self {
        self.listener.cancel = Some(Rc::new(callback));
        self
    }

    pub fn on_interrupt(mut self, callback: impl Fn() + 'static) -> Self {
        self.listener.interrupt = Some(Rc::new(callback));
        self
    }

    pub fn on_keyup(mut self, callback: impl Fn() + 'static) -> Self {
        self.listener.keyup = Some(Rc::new(callback));
        self
    }

    pub fn on_blur(mut self, callback: impl Fn() + 'static) -> Self {
        self.listener.blur = Some(Rc::new(callback));
        self
    }

    pub fn build(self) -> Rc<InputListener> {
        Rc::new(self.listener)
    }
}
