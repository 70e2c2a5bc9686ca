// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Starting points for new components.
//!
//! [`ExampleFull`](ExampleFull) goes through the complete lifecycle: isolated root,
//! open-ended state that hosts can write to after `ready`, the reset stylesheet.
//! [`ExampleSimple`](ExampleSimple) renders once into its host's own children and
//! has no state at all.
use std::borrow::Cow;

use kiln::prelude::*;
use kiln::render::Escape;
use kiln::state::{dict, Dict};

const GREETING: &str = "Hello World 👋!";

pub struct ExampleFull;

impl Component for ExampleFull {
    const TAG: &'static str = "example-full";

    type State = Dict;

    fn init(&self) -> Dict {
        Dict::new()
    }

    fn template(&self, state: &Dict, _: &Attributes) -> String {
        let greeting = match dict::text(state, "greeting") {
            "" => GREETING,
            greeting => greeting,
        };

        format!("<h2>{}</h2>", Escape(greeting))
    }
}

pub struct ExampleSimple;

impl Component for ExampleSimple {
    const TAG: &'static str = "example-simple";
    const SHADOW: bool = false;

    type State = ();

    fn init(&self) {}

    fn template(&self, _: &(), _: &Attributes) -> String {
        format!("<h2>{GREETING}</h2>")
    }

    // Light DOM has no `:host` to reset
    fn css(&self) -> Cow<'static, str> {
        Cow::Borrowed("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_renders_greeting_with_reset() {
        let root = MemoryRoot::new();
        let example = Element::build(ExampleFull, root.clone());

        assert!(root.markup().starts_with("<style>"));
        assert!(root.markup().contains(":host { display: block; }"));
        assert!(root.markup().contains("<h2>Hello World 👋!</h2>"));

        example.connect();

        assert_eq!(root.emitted(), ["ready"]);
    }

    #[test]
    fn full_state_is_open_ended() {
        let root = MemoryRoot::new();
        let example = Element::build(ExampleFull, root.clone());

        assert!(example.state().insert("greeting", "Moin <3"));
        assert!(root.markup().contains("<h2>Moin &lt;3</h2>"));

        assert!(!example.state().insert("greeting", "Moin <3"));
        assert!(example.state().insert("count", json!(3)));

        assert_eq!(example.renders(), 3);
        assert_eq!(example.state().value("count"), json!(3));
        assert_eq!(example.state().value("missing"), serde_json::Value::Null);
    }

    #[test]
    fn simple_renders_plain_markup() {
        let root = MemoryRoot::new();
        let example = Element::build(ExampleSimple, root.clone());

        assert_eq!(root.markup(), "<h2>Hello World 👋!</h2>");
        assert_eq!(example.renders(), 1);
        assert_eq!(root.listener_count(), 0);
    }
}
