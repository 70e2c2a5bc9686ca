// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Producing component markup

use std::borrow::Cow;
use std::fmt;

use crate::attribute::Attributes;
use crate::Component;

/// Default stylesheet of every component rendered into a shadow root.
pub const RESET_CSS: &str = "
    :host { display: block; }
    :host * { box-sizing: border-box; }
";

/// Render the complete content of a component's root: the stylesheet followed by
/// the template. Calling this has no side effects.
pub fn render<C: Component>(component: &C, state: &C::State, attributes: &Attributes) -> String {
    let css = component.css();
    let body = component.template(state, attributes);

    if css.is_empty() {
        return body;
    }

    let mut markup = String::with_capacity(css.len() + body.len() + 15);

    markup.push_str("<style>");
    markup.push_str(&css);
    markup.push_str("</style>");
    markup.push_str(&body);
    markup
}

/// A named style override point: a CSS custom property the host page may set,
/// and the value used when it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleHook {
    pub name: &'static str,
    pub fallback: &'static str,
}

impl StyleHook {
    pub const fn new(name: &'static str, fallback: &'static str) -> Self {
        StyleHook { name, fallback }
    }
}

/// Renders as `var(--name, fallback)`.
impl fmt::Display for StyleHook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "var({}, {})", self.name, self.fallback)
    }
}

/// Escape text for use in element content or a quoted attribute value.
pub fn escape(text: &str) -> Cow<str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);

    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            ch => out.push(ch),
        }
    }

    Cow::Owned(out)
}

/// [`Display`](fmt::Display) wrapper that escapes its content, for use with `write!`.
pub struct Escape<'a>(pub &'a str);

impl fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&escape(self.0))
    }
}
