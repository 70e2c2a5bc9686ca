// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fire-and-forget notifications from a component to its host

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Emitted every time an element is connected to a document.
pub const READY: &str = "ready";

type Observer<T> = Rc<dyn Fn(&T)>;

/// Observers of named signals, invoked with a reference to the emitter.
pub struct Signals<T> {
    observers: RefCell<Vec<(Cow<'static, str>, Observer<T>)>>,
}

impl<T> Default for Signals<T> {
    fn default() -> Self {
        Signals {
            observers: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Signals<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` for `signal`.
    pub fn on<F>(&self, signal: impl Into<Cow<'static, str>>, observer: F)
    where
        F: Fn(&T) + 'static,
    {
        self.observers
            .borrow_mut()
            .push((signal.into(), Rc::new(observer)));
    }

    /// Invoke all observers of `signal` in registration order. Returns how many ran.
    ///
    /// Observers registered while this runs are not invoked for this emission.
    pub fn emit(&self, signal: &str, emitter: &T) -> usize {
        let observers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .filter(|(name, _)| name == signal)
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in &observers {
            observer(emitter);
        }

        observers.len()
    }

    pub fn count(&self, signal: &str) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|(name, _)| name == signal)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_in_order_to_matching_observers() {
        let signals = Signals::<RefCell<Vec<&str>>>::new();

        signals.on("ready", |log| log.borrow_mut().push("first"));
        signals.on("list-change", |log| log.borrow_mut().push("other"));
        signals.on("ready", |log| log.borrow_mut().push("second"));

        let log = RefCell::new(Vec::new());

        assert_eq!(signals.emit("ready", &log), 2);
        assert_eq!(*log.borrow(), ["first", "second"]);
        assert_eq!(signals.emit("missing", &log), 0);
    }

    #[test]
    fn observer_may_register_during_emit() {
        let signals = Rc::new(Signals::<u8>::new());
        let inner = signals.clone();

        signals.on("ready", move |_| inner.on("ready", |_| ()));

        assert_eq!(signals.emit("ready", &0), 1);
        assert_eq!(signals.count("ready"), 2);
    }
}
