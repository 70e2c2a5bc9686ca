// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding declared listeners to freshly committed markup
//!
//! A component declares its listeners in [`Component::listen`](crate::Component::listen)
//! as `(selector, event, handler)` triples. After every commit the whole list is
//! bound again to the new content: nothing is bound incrementally, and nothing bound
//! to the previous content survives it.

use std::rc::Rc;

use crate::dom::{Event, Handler};
use crate::lifecycle::Element;
use crate::Component;

type Callback<C> = Rc<dyn Fn(&Element<C>, &Event)>;

struct Binding<C: Component> {
    selector: &'static str,
    event: &'static str,
    callback: Callback<C>,
}

/// Collects the listeners a component declares for one render.
pub struct Binder<C: Component> {
    bindings: Vec<Binding<C>>,
}

impl<C: Component> Binder<C> {
    pub(crate) fn new() -> Self {
        Binder {
            bindings: Vec::new(),
        }
    }

    /// Listen to `event` on every element matching `selector`.
    ///
    /// The handler receives the element that rendered the markup, through which it can
    /// read and write state or emit signals.
    pub fn on<F>(&mut self, selector: &'static str, event: &'static str, handler: F) -> &mut Self
    where
        F: Fn(&Element<C>, &Event) + 'static,
    {
        self.bindings.push(Binding {
            selector,
            event,
            callback: Rc::new(handler),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Bind every listener `element`'s component declares to its current content.
/// Returns the number of elements bound.
pub(crate) fn bind<C: Component>(element: &Element<C>) -> usize {
    let mut binder = Binder::new();

    element.component().listen(&mut binder);

    let mut bound = 0;

    for Binding {
        selector,
        event,
        callback,
    } in binder.bindings
    {
        let weak = element.downgrade();
        let handler: Handler = Rc::new(move |event: &Event| {
            if let Some(element) = weak.upgrade() {
                callback(&element, event);
            }
        });

        let count = element.root().attach(selector, event, handler);

        log::trace!("<{}> bound `{event}` to {count} `{selector}` element(s)", C::TAG);

        bound += count;
    }

    bound
}
