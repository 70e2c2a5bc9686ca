// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering roots: the isolated subtree a component fully owns

use std::rc::Rc;

use wasm_bindgen::JsCast;

use crate::attribute::Attributes;

mod memory;
mod retire;
mod selector;
mod web;

pub use memory::{MemoryRoot, Node};
pub use selector::Selector;
pub use web::WebRoot;

/// Listener bound to an element of the committed markup.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Receiver of host attribute changes: `(name, old, new)`.
pub type AttributeSink = Rc<dyn Fn(&str, Option<&str>, Option<&str>)>;

/// Snapshot of a DOM event as seen by a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Event type, e.g. `"click"` or `"change"`.
    pub kind: String,
    /// `id` of the target element, if it has one.
    pub id: Option<String>,
    /// `checked` state of the target if it is an input.
    pub checked: bool,
    /// `value` of the target if it is an input.
    pub value: Option<String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Event {
            kind: kind.into(),
            ..Event::default()
        }
    }
}

/// The isolated subtree a component instance renders into.
///
/// All methods take `&self`: a root may be re-entered from within one of its own
/// listeners, when that listener mutates state and triggers a nested render.
pub trait Root: 'static {
    /// Replace the entire content with `markup`. Listeners bound to the previous
    /// content are gone afterwards.
    fn commit(&self, markup: &str);

    /// Bind `handler` for `event` to every element of the current content matching
    /// `selector`. Returns the number of elements bound.
    fn attach(&self, selector: &str, event: &str, handler: Handler) -> usize;

    /// Dispatch a bubbling custom event named `signal` on the host.
    fn emit(&self, signal: &str);

    /// Attributes present on the host when the component is constructed.
    fn attributes(&self) -> Attributes {
        Attributes::new()
    }

    /// Start forwarding changes of the `observed` host attributes to `sink`.
    fn observe(&self, _observed: &'static [&'static str], _sink: AttributeSink) {}

    /// Stop forwarding attribute changes, the component is gone.
    fn disconnect(&self) {}
}

pub(crate) fn into_element(node: web_sys::Node) -> Option<web_sys::Element> {
    node.dyn_into::<web_sys::Element>().ok()
}
