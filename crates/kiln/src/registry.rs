// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Following hosts through the document
//!
//! [`define`](define) mounts a component onto every host with its tag and keeps
//! watching the document afterwards:
//!
//! - a host inserted later is mounted,
//! - a mounted host that is moved is connected again, emitting `ready`,
//! - a mounted host that leaves the document is disconnected and forgotten.
//!
//! Changes are picked up by a `MutationObserver`, once the script that made them
//! has finished. A host that is removed and inserted again in a later task gets
//! a fresh instance.
use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, MutationObserver, MutationObserverInit, MutationRecord, Node, NodeList};

use crate::dom::into_element;
use crate::lifecycle::Element;
use crate::{mount_with, Component, MountError};

type Callback = Closure<dyn FnMut(Array, MutationObserver)>;

struct Shared<C: Component> {
    make: RefCell<Box<dyn FnMut() -> C>>,
    setup: RefCell<Box<dyn FnMut(&Element<C>)>>,
    mounted: RefCell<Vec<(web_sys::Element, Element<C>)>>,
}

/// Every instance of component `C` in the document. Dropping it stops watching
/// the document, already mounted elements stay as they are.
pub struct Registry<C: Component> {
    shared: Rc<Shared<C>>,
    observer: MutationObserver,
    _callback: Callback,
}

/// Mount `C` onto every host with tag [`C::TAG`](Component::TAG), now and later.
pub fn define<C, F>(make: F) -> Result<Registry<C>, MountError>
where
    C: Component,
    F: FnMut() -> C + 'static,
{
    define_with(make, |_| ())
}

/// Like [`define`](define), calling `setup` on each element before it is connected.
pub fn define_with<C, F, S>(make: F, setup: S) -> Result<Registry<C>, MountError>
where
    C: Component,
    F: FnMut() -> C + 'static,
    S: FnMut(&Element<C>) + 'static,
{
    let document = document()?;
    let shared = Rc::new(Shared {
        make: RefCell::new(Box::new(make)),
        setup: RefCell::new(Box::new(setup)),
        mounted: RefCell::new(Vec::new()),
    });

    for host in hosts(&document, C::TAG)? {
        shared.mount(host)?;
    }

    let inner = shared.clone();
    let callback: Callback = Closure::new(move |records: Array, _: MutationObserver| {
        let mut added = Vec::new();

        for record in records.iter() {
            let nodes = record.unchecked_into::<MutationRecord>().added_nodes();

            added.extend((0..nodes.length()).filter_map(|idx| nodes.get(idx)));
        }

        inner.sync(&added);
    });

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();

    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&document, &options)?;

    log::debug!(
        "defined <{}>, {} element(s) mounted",
        C::TAG,
        shared.mounted.borrow().len()
    );

    Ok(Registry {
        shared,
        observer,
        _callback: callback,
    })
}

impl<C: Component> Registry<C> {
    /// All mounted elements, in mounting order.
    pub fn elements(&self) -> Vec<Element<C>> {
        let mounted = self.shared.mounted.borrow();

        mounted.iter().map(|(_, element)| element.clone()).collect()
    }

    /// The element mounted onto `host`.
    pub fn get(&self, host: &web_sys::Element) -> Option<Element<C>> {
        self.shared.find(host)
    }

    pub fn len(&self) -> usize {
        self.shared.mounted.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Component> Drop for Registry<C> {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl<C: Component> Shared<C> {
    fn find(&self, host: &web_sys::Element) -> Option<Element<C>> {
        let mounted = self.mounted.borrow();

        mounted
            .iter()
            .find(|(mounted, _)| mounted == host)
            .map(|(_, element)| element.clone())
    }

    fn mount(&self, host: web_sys::Element) -> Result<(), MountError> {
        let component = {
            let mut make = self.make.borrow_mut();

            (*make)()
        };
        let element = {
            let mut setup = self.setup.borrow_mut();

            mount_with(&host, component, |element| (*setup)(element))?
        };

        self.mounted.borrow_mut().push((host, element));

        Ok(())
    }

    fn sync(&self, added: &[Node]) {
        let mut gone = Vec::new();
        let mut moved = Vec::new();

        self.mounted.borrow_mut().retain(|(host, element)| {
            if !host.is_connected() {
                gone.push(element.clone());
                return false;
            }

            let host: &Node = host;

            if added.iter().any(|node| node.contains(Some(host))) {
                moved.push(element.clone());
            }

            true
        });

        for element in gone {
            element.disconnect();
        }

        for element in moved {
            log::debug!("<{}> moved, connecting again", C::TAG);

            element.connect();
        }

        for node in added {
            let Some(el) = node.dyn_ref::<web_sys::Element>() else {
                continue;
            };

            let found = match within(el, C::TAG) {
                Ok(found) => found,
                Err(err) => {
                    log::warn!("failed to look for <{}>: {err}", C::TAG);
                    continue;
                }
            };

            for host in found {
                if !host.is_connected() || self.find(&host).is_some() {
                    continue;
                }

                if let Err(err) = self.mount(host) {
                    log::warn!("failed to mount <{}>: {err}", C::TAG);
                }
            }
        }
    }
}

pub(crate) fn document() -> Result<Document, MountError> {
    web_sys::window()
        .ok_or(MountError::NoWindow)?
        .document()
        .ok_or(MountError::NoDocument)
}

/// Elements of `document` with tag `tag`, in document order.
pub(crate) fn hosts(document: &Document, tag: &str) -> Result<Vec<web_sys::Element>, MountError> {
    Ok(elements(document.query_selector_all(tag)?))
}

/// `el` itself and its descendants with tag `tag`.
fn within(el: &web_sys::Element, tag: &str) -> Result<Vec<web_sys::Element>, MountError> {
    let mut found = Vec::new();

    if el.matches(tag)? {
        found.push(el.clone());
    }

    found.extend(elements(el.query_selector_all(tag)?));

    Ok(found)
}

fn elements(nodes: NodeList) -> Vec<web_sys::Element> {
    (0..nodes.length())
        .filter_map(|idx| nodes.get(idx).and_then(into_element))
        .collect()
}
