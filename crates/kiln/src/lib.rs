// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Kiln
//!
//! _Small self-contained web components._
//!
//! **Kiln** builds widgets that can be dropped into any host page without leaking
//! styles or listeners. Each component renders into its own isolated root (usually
//! a [shadow root](https://developer.mozilla.org/en-US/docs/Web/API/ShadowRoot)),
//! owns a small piece of [observable state](state::Observable), and re-renders its
//! entire markup whenever a field of that state effectively changes.
//!
//! There is no virtual DOM and no diffing. Every render produces a fresh markup
//! string that fully replaces the previous content, after which all event listeners
//! the component declares are bound again to the new nodes.
//!
//! ### Counter
//!
//! ```
//! use kiln::prelude::*;
//!
//! struct Counter;
//!
//! impl Component for Counter {
//!     const TAG: &'static str = "kiln-counter";
//!
//!     type State = u32;
//!
//!     fn init(&self) -> u32 {
//!         0
//!     }
//!
//!     fn template(&self, count: &u32, _: &Attributes) -> String {
//!         format!("<button>{count}</button>")
//!     }
//!
//!     fn listen(&self, bind: &mut Binder<Self>) {
//!         bind.on("button", "click", |counter, _| {
//!             counter.state().update(|count| *count += 1);
//!         });
//!     }
//! }
//!
//! let root = MemoryRoot::new();
//! let counter = Element::build(Counter, root.clone());
//!
//! root.dispatch("button", "click");
//!
//! assert_eq!(*counter.state().read(), 1);
//! assert!(root.markup().contains("<button>1</button>"));
//! ```

use std::borrow::Cow;

mod error;

pub mod attribute;
pub mod dom;
pub mod lifecycle;
pub mod listen;
pub mod registry;
pub mod render;
pub mod signal;
pub mod state;

pub use error::MountError;
pub use registry::{define, define_with, Registry};

/// The prelude module with most commonly used types.
pub mod prelude {
    pub use crate::attribute::Attributes;
    pub use crate::dom::{Event, MemoryRoot, Root};
    pub use crate::lifecycle::{Element, Phase};
    pub use crate::listen::Binder;
    pub use crate::render::StyleHook;
    pub use crate::state::{Observable, ShouldRender, Then};
    pub use crate::Component;
}

use attribute::Attributes;
use dom::WebRoot;
use lifecycle::Element;
use listen::Binder;
use render::StyleHook;

/// Behavior of a concrete component type.
///
/// A component describes _what_ to render and which events to listen to. The shared
/// [`Element`](Element) driver owns the instance state machine and calls into the
/// component on every render.
pub trait Component: Sized + 'static {
    /// Tag name used for this component in host markup, e.g. `"progress-list"`.
    const TAG: &'static str;

    /// Attribute names that trigger a render when they change. Names are compared
    /// ASCII case-insensitively, since HTML parsers lowercase attribute names.
    const OBSERVED: &'static [&'static str] = &[];

    /// Render into an isolated shadow root when `true`, into the host's own
    /// children otherwise.
    const SHADOW: bool = true;

    /// State owned by each instance.
    type State: 'static;

    /// Produce a fresh copy of the default state for a new instance.
    fn init(&self) -> Self::State;

    /// Markup for the given state and attributes. Must be pure.
    fn template(&self, state: &Self::State, attributes: &Attributes) -> String;

    /// Stylesheet embedded ahead of the markup on every render.
    fn css(&self) -> Cow<'static, str> {
        Cow::Borrowed(render::RESET_CSS)
    }

    /// Named style override points the host page can set.
    fn style_hooks(&self) -> &'static [StyleHook] {
        &[]
    }

    /// Declare event listeners, bound again after every render.
    fn listen(&self, _bind: &mut Binder<Self>) {}
}

/// Mount a component onto an existing host element in a live document.
///
/// The element is constructed (rendered once), its observed attributes are watched
/// for changes, and it is connected, which fires the `ready` signal. That first
/// `ready` has been emitted by the time this returns, so Rust observers that need
/// to see it must be registered through [`mount_with`](mount_with).
///
/// Attribute changes are delivered by a `MutationObserver`, after the script that
/// changed them has finished.
pub fn mount<C: Component>(
    host: &web_sys::Element,
    component: C,
) -> Result<Element<C>, MountError> {
    mount_with(host, component, |_| ())
}

/// Like [`mount`](mount), calling `setup` on the element before it is connected.
pub fn mount_with<C, S>(
    host: &web_sys::Element,
    component: C,
    setup: S,
) -> Result<Element<C>, MountError>
where
    C: Component,
    S: FnOnce(&Element<C>),
{
    init_panic_hook();

    let root = if C::SHADOW {
        WebRoot::shadow(host)?
    } else {
        WebRoot::light(host)
    };

    let element = Element::build(component, root);

    setup(&element);
    element.connect();

    Ok(element)
}

/// Mount a component onto every element currently in the document matching
/// [`C::TAG`](Component::TAG). Hosts added later are not picked up, use
/// [`define`](define) for that.
pub fn mount_all<C, F>(mut make: F) -> Result<Vec<Element<C>>, MountError>
where
    C: Component,
    F: FnMut() -> C,
{
    let document = registry::document()?;
    let mut elements = Vec::new();

    for host in registry::hosts(&document, C::TAG)? {
        elements.push(mount(&host, make())?);
    }

    log::debug!("mounted {} <{}> element(s)", elements.len(), C::TAG);

    Ok(elements)
}

fn init_panic_hook() {
    // Only enable console hook on debug builds
    #[cfg(debug_assertions)]
    {
        use std::cell::Cell;

        thread_local! {
            static INIT: Cell<bool> = Cell::new(false);
        }
        if !INIT.with(|init| init.get()) {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));

            INIT.with(|init| init.set(true));
        }
    }
}
