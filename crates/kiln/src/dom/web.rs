// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, CustomEventInit, HtmlInputElement, MutationObserver, MutationObserverInit,
    MutationRecord, ShadowRoot, ShadowRootInit, ShadowRootMode,
};

use crate::attribute::Attributes;
use crate::dom::retire::Retired;
use crate::dom::{into_element, AttributeSink, Event, Handler, Root};
use crate::MountError;

enum Target {
    Shadow(ShadowRoot),
    Light(web_sys::Element),
}

type Listener = Closure<dyn FnMut(web_sys::Event)>;

type Observer = (MutationObserver, Closure<dyn FnMut(Array, MutationObserver)>);

/// A rendering root in a live browser document.
pub struct WebRoot {
    host: web_sys::Element,
    target: Target,
    listeners: RefCell<Vec<Listener>>,
    retired: Retired<Listener>,
    observer: RefCell<Option<Observer>>,
}

impl WebRoot {
    /// Attach an open shadow root to `host` and render into it.
    pub fn shadow(host: &web_sys::Element) -> Result<Self, MountError> {
        let shadow = match host.shadow_root() {
            Some(shadow) => shadow,
            None => host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?,
        };

        Ok(Self::new(host, Target::Shadow(shadow)))
    }

    /// Render directly into the children of `host`.
    pub fn light(host: &web_sys::Element) -> Self {
        Self::new(host, Target::Light(host.clone()))
    }

    fn new(host: &web_sys::Element, target: Target) -> Self {
        WebRoot {
            host: host.clone(),
            target,
            listeners: RefCell::new(Vec::new()),
            retired: Retired::new(),
            observer: RefCell::new(None),
        }
    }

    pub fn host(&self) -> &web_sys::Element {
        &self.host
    }

    /// Number of listeners bound to the current content.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of listeners of replaced content not freed yet.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    fn query_all(&self, selector: &str) -> Result<web_sys::NodeList, JsValue> {
        match &self.target {
            Target::Shadow(shadow) => shadow.query_selector_all(selector),
            Target::Light(el) => el.query_selector_all(selector),
        }
    }
}

impl Root for WebRoot {
    fn commit(&self, markup: &str) {
        match &self.target {
            Target::Shadow(shadow) => shadow.set_inner_html(markup),
            Target::Light(el) => el.set_inner_html(markup),
        }

        // The nodes these were bound to are gone
        let stale = std::mem::take(&mut *self.listeners.borrow_mut());

        self.retired.retire(stale);
    }

    fn attach(&self, selector: &str, event: &str, handler: Handler) -> usize {
        let nodes = match self.query_all(selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("invalid selector `{selector}`: {err:?}");
                return 0;
            }
        };

        let mut count = 0;

        for idx in 0..nodes.length() {
            let Some(el) = nodes.get(idx).and_then(into_element) else {
                continue;
            };

            let handler = handler.clone();
            let calls = self.retired.calls();
            let listener = Listener::new(move |event: web_sys::Event| {
                calls.enter();
                handler(&snapshot(&event));
                calls.leave();
            });

            match el.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
                Ok(()) => {
                    self.listeners.borrow_mut().push(listener);
                    count += 1;
                }
                Err(err) => log::warn!("failed to listen to `{event}` on `{selector}`: {err:?}"),
            }
        }

        count
    }

    fn emit(&self, signal: &str) {
        let init = CustomEventInit::new();

        init.set_bubbles(true);
        init.set_composed(true);

        let dispatched = CustomEvent::new_with_event_init_dict(signal, &init)
            .and_then(|event| self.host.dispatch_event(&event));

        if let Err(err) = dispatched {
            log::warn!("failed to dispatch `{signal}`: {err:?}");
        }
    }

    fn attributes(&self) -> Attributes {
        self.host
            .get_attribute_names()
            .iter()
            .filter_map(|name| name.as_string())
            .filter_map(|name| {
                let value = self.host.get_attribute(&name)?;

                Some((name, value))
            })
            .collect()
    }

    fn observe(&self, observed: &'static [&'static str], sink: AttributeSink) {
        if observed.is_empty() {
            return;
        }

        let host = self.host.clone();
        let callback: Closure<dyn FnMut(Array, MutationObserver)> =
            Closure::new(move |records: Array, _: MutationObserver| {
                for record in records.iter() {
                    let record: MutationRecord = record.unchecked_into();

                    if let Some(name) = record.attribute_name() {
                        let new = host.get_attribute(&name);

                        sink(&name, record.old_value().as_deref(), new.as_deref());
                    }
                }
            });

        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::warn!("failed to create attribute observer: {err:?}");
                return;
            }
        };

        // Attribute names of HTML elements are lowercase in the DOM
        let filter: Array = observed
            .iter()
            .map(|name| JsValue::from_str(&name.to_ascii_lowercase()))
            .collect();
        let options = MutationObserverInit::new();

        options.set_attributes(true);
        options.set_attribute_old_value(true);
        options.set_attribute_filter(&filter);

        if let Err(err) = observer.observe_with_options(&self.host, &options) {
            log::warn!("failed to observe attributes: {err:?}");
            return;
        }

        *self.observer.borrow_mut() = Some((observer, callback));
    }

    fn disconnect(&self) {
        if let Some((observer, _)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
    }
}

fn snapshot(event: &web_sys::Event) -> Event {
    let target = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok());
    let input = target.as_ref().and_then(|el| el.dyn_ref::<HtmlInputElement>());
    let id = target.as_ref().map(|el| el.id()).filter(|id| !id.is_empty());

    Event {
        kind: event.type_(),
        id,
        checked: input.map_or(false, |input| input.checked()),
        value: input.map(|input| input.value()),
    }
}
