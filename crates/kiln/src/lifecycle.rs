// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Component instances
//!
//! [`Element`](Element) is the single driver shared by every component type. It owns
//! the instance's [`Observable`](Observable) state, its host attributes and its
//! rendering [`Root`](Root), and runs the same render + rebind routine for every
//! trigger: construction, an observed attribute changing, and an effective state
//! write.
//!
//! ```text
//!  build ──▶ Constructed ──connect──▶ Connected ◀──┐
//!                 │                      │  │      │ attribute changed
//!                 │                      │  └──▶ AttributeUpdating
//!                 └──────disconnect──────┴──▶ Disconnected
//! ```
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::attribute::{self, Attributes};
use crate::dom::{AttributeSink, Root};
use crate::signal::{self, Signals};
use crate::state::Observable;
use crate::{listen, render, Component};

/// Where an element is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// State initialized and first render done, not yet attached to a document.
    Constructed,
    /// Attached to a document, `ready` has been emitted.
    Connected,
    /// Rendering in response to an observed attribute change.
    AttributeUpdating,
    /// Removed for good, nothing renders anymore.
    Disconnected,
}

struct Inner<C: Component> {
    component: C,
    state: Observable<C::State>,
    attributes: RefCell<Attributes>,
    phase: Cell<Phase>,
    root: Box<dyn Root>,
    signals: Signals<Element<C>>,
    renders: Cell<usize>,
    binds: Cell<usize>,
}

/// Handle to a component instance. Clones refer to the same instance.
pub struct Element<C: Component> {
    inner: Rc<Inner<C>>,
}

/// Non-owning handle to a component instance.
pub struct WeakElement<C: Component> {
    inner: Weak<Inner<C>>,
}

impl<C: Component> Element<C> {
    /// Construct an instance rendering into `root`: initialize state from
    /// [`Component::init`](Component::init), render once, bind listeners and start
    /// watching observed attributes.
    pub fn build(component: C, root: impl Root) -> Self {
        let attributes = root.attributes();

        let inner = Rc::new_cyclic(move |weak: &Weak<Inner<C>>| {
            let weak = weak.clone();
            let state = Observable::new(component.init(), move || {
                if let Some(inner) = weak.upgrade() {
                    Element { inner }.refresh();
                }
            });

            Inner {
                component,
                state,
                attributes: RefCell::new(attributes),
                phase: Cell::new(Phase::Constructed),
                root: Box::new(root),
                signals: Signals::new(),
                renders: Cell::new(0),
                binds: Cell::new(0),
            }
        });

        let element = Element { inner };

        element.refresh();

        if !C::OBSERVED.is_empty() {
            let weak = element.downgrade();
            // Roots may report a change more than once, or report the newest value of
            // a change already applied. Only the value last applied counts as old.
            let sink: AttributeSink =
                Rc::new(move |name: &str, _: Option<&str>, new: Option<&str>| {
                    if let Some(element) = weak.upgrade() {
                        let old = element.attributes().get(name).map(str::to_owned);

                        element.attribute_changed(name, old.as_deref(), new);
                    }
                });

            element.root().observe(C::OBSERVED, sink);
        }

        element
    }

    /// The element became part of a live document. Emits [`READY`](signal::READY),
    /// again on every call, so an element moved within its document announces
    /// itself again.
    pub fn connect(&self) {
        if self.phase() == Phase::Disconnected {
            log::debug!("<{}> is disconnected, ignoring connect", C::TAG);
            return;
        }

        self.inner.phase.set(Phase::Connected);
        self.emit(signal::READY);
    }

    /// An attribute of the host changed. Renders if `name` is observed and the value
    /// actually changed, returning whether it did.
    pub fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) -> bool {
        if !attribute::is_observed(C::OBSERVED, name) || old == new {
            return false;
        }

        self.inner.attributes.borrow_mut().apply(name, new);

        let prior = self.phase();

        if prior == Phase::Disconnected {
            return false;
        }

        self.inner.phase.set(Phase::AttributeUpdating);
        self.refresh();
        self.inner.phase.set(prior);

        true
    }

    /// Remove the element for good. Later state writes are tolerated but render nothing.
    pub fn disconnect(&self) {
        if self.phase() == Phase::Disconnected {
            return;
        }

        log::debug!("<{}> disconnected", C::TAG);

        self.inner.phase.set(Phase::Disconnected);
        self.root().disconnect();
    }

    /// Observe signal `name`, e.g. [`READY`](signal::READY). May be called before or
    /// after connecting. Capture a [`WeakElement`](WeakElement) rather than a clone in
    /// `observer` to avoid keeping the element alive through its own observer.
    pub fn on<F>(&self, name: &'static str, observer: F)
    where
        F: Fn(&Element<C>) + 'static,
    {
        self.inner.signals.on(name, observer);
    }

    /// Notify observers of `name`, then dispatch it on the host.
    pub fn emit(&self, name: &str) {
        let observers = self.inner.signals.emit(name, self);

        log::debug!("<{}> emitted `{name}` to {observers} observer(s)", C::TAG);

        self.root().emit(name);
    }

    pub fn state(&self) -> &Observable<C::State> {
        &self.inner.state
    }

    pub fn attributes(&self) -> Ref<'_, Attributes> {
        self.inner.attributes.borrow()
    }

    pub fn component(&self) -> &C {
        &self.inner.component
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Number of renders committed so far.
    pub fn renders(&self) -> usize {
        self.inner.renders.get()
    }

    /// Number of times listeners have been bound so far.
    pub fn binds(&self) -> usize {
        self.inner.binds.get()
    }

    pub fn downgrade(&self) -> WeakElement<C> {
        WeakElement {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn root(&self) -> &dyn Root {
        &*self.inner.root
    }

    /// Render, commit and rebind. The one rendering path for every trigger.
    fn refresh(&self) {
        let inner = &self.inner;

        if inner.phase.get() == Phase::Disconnected {
            log::debug!("<{}> is disconnected, render suppressed", C::TAG);
            return;
        }

        let markup = {
            let state = inner.state.read();
            let attributes = inner.attributes.borrow();

            render::render(&inner.component, &state, &attributes)
        };

        inner.root.commit(&markup);
        inner.renders.set(inner.renders.get() + 1);

        log::debug!("<{}> committed render #{}", C::TAG, inner.renders.get());

        listen::bind(self);
        inner.binds.set(inner.binds.get() + 1);
    }
}

impl<C: Component> Clone for Element<C> {
    fn clone(&self) -> Self {
        Element {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Component> fmt::Debug for Element<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &C::TAG)
            .field("phase", &self.phase())
            .field("renders", &self.renders())
            .finish()
    }
}

impl<C: Component> WeakElement<C> {
    pub fn upgrade(&self) -> Option<Element<C>> {
        self.inner.upgrade().map(|inner| Element { inner })
    }
}

impl<C: Component> Clone for WeakElement<C> {
    fn clone(&self) -> Self {
        WeakElement {
            inner: self.inner.clone(),
        }
    }
}
