// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;

use crate::attribute::Attributes;
use crate::dom::{AttributeSink, Event, Handler, Root, Selector};

/// An element of committed markup, as scanned by [`MemoryRoot`](MemoryRoot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    checked: bool,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of attribute `name`. Boolean attributes have an empty value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map_or(false, |list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Live `checked` state, initially the presence of the `checked` attribute.
    pub fn checked(&self) -> bool {
        self.checked
    }

    fn event(&self, kind: &str) -> Event {
        Event {
            kind: kind.to_owned(),
            id: self.id().map(str::to_owned),
            checked: self.checked,
            value: self.attribute("value").map(str::to_owned),
        }
    }
}

struct Slot {
    node: Node,
    listeners: Vec<(String, Handler)>,
}

#[derive(Default)]
struct Tree {
    markup: String,
    slots: Vec<Slot>,
    commits: usize,
    emitted: Vec<String>,
    host: Attributes,
    observer: Option<(&'static [&'static str], AttributeSink)>,
}

/// A rendering root kept entirely in memory.
///
/// Committed markup is scanned into a flat list of elements that selectors can be
/// matched against. Events are delivered with [`dispatch`](MemoryRoot::dispatch) and
/// [`toggle`](MemoryRoot::toggle). This is a cheap handle, clones share the same tree,
/// so one clone can be given to an [`Element`](crate::lifecycle::Element) while another
/// is used to drive and inspect it.
#[derive(Clone, Default)]
pub struct MemoryRoot {
    tree: Rc<RefCell<Tree>>,
}

impl MemoryRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root whose host carries `attributes` at construction time.
    pub fn with_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let root = Self::new();

        root.tree.borrow_mut().host = attributes.into_iter().collect();
        root
    }

    /// Currently committed markup.
    pub fn markup(&self) -> String {
        self.tree.borrow().markup.clone()
    }

    /// Number of commits so far.
    pub fn commits(&self) -> usize {
        self.tree.borrow().commits
    }

    /// Signals emitted on the host, in order.
    pub fn emitted(&self) -> Vec<String> {
        self.tree.borrow().emitted.clone()
    }

    /// All elements of the current content.
    pub fn nodes(&self) -> Vec<Node> {
        self.tree.borrow().slots.iter().map(|s| s.node.clone()).collect()
    }

    /// Elements of the current content matching `selector`.
    pub fn select(&self, selector: &str) -> Vec<Node> {
        let Some(selector) = parse(selector) else {
            return Vec::new();
        };

        self.tree
            .borrow()
            .slots
            .iter()
            .filter(|slot| matches(&selector, &slot.node))
            .map(|slot| slot.node.clone())
            .collect()
    }

    /// Total number of listeners bound to the current content.
    pub fn listener_count(&self) -> usize {
        self.tree.borrow().slots.iter().map(|s| s.listeners.len()).sum()
    }

    /// Fire `event` on every element matching `selector`. Returns the number of
    /// listeners invoked.
    pub fn dispatch(&self, selector: &str, event: &str) -> usize {
        self.fire(selector, event, |_| ())
    }

    /// Flip the `checked` state of every element matching `selector` and fire
    /// `change` on each, the way a user clicking a checkbox would.
    pub fn toggle(&self, selector: &str) -> usize {
        self.fire(selector, "change", |node| node.checked ^= true)
    }

    /// Change an attribute on the host, forwarding it to the observer if the
    /// name is on its observed list.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) {
        let (old, sink) = {
            let mut tree = self.tree.borrow_mut();
            let old = tree.host.apply(name, value);
            let sink = tree
                .observer
                .as_ref()
                .filter(|(observed, _)| crate::attribute::is_observed(observed, name))
                .map(|(_, sink)| sink.clone());

            (old, sink)
        };

        if let Some(sink) = sink {
            sink(name, old.as_deref(), value);
        }
    }

    /// Whether an attribute observer is installed.
    pub fn is_observed(&self) -> bool {
        self.tree.borrow().observer.is_some()
    }

    fn fire<F>(&self, selector: &str, kind: &str, mut prepare: F) -> usize
    where
        F: FnMut(&mut Node),
    {
        let Some(selector) = parse(selector) else {
            return 0;
        };

        // Listeners are cloned out so that they can freely re-enter the root
        let mut pending = Vec::new();

        for slot in self.tree.borrow_mut().slots.iter_mut() {
            if !matches(&selector, &slot.node) {
                continue;
            }

            prepare(&mut slot.node);

            let event = slot.node.event(kind);

            for (_, handler) in slot.listeners.iter().filter(|(k, _)| k == kind) {
                pending.push((event.clone(), handler.clone()));
            }
        }

        let count = pending.len();

        for (event, handler) in pending {
            handler(&event);
        }

        count
    }
}

impl Root for MemoryRoot {
    fn commit(&self, markup: &str) {
        let slots = scan(markup)
            .into_iter()
            .map(|node| Slot {
                node,
                listeners: Vec::new(),
            })
            .collect();

        let mut tree = self.tree.borrow_mut();

        tree.markup = markup.to_owned();
        tree.commits += 1;

        // Dropped after the borrow is released, handlers may own other roots
        let _stale = std::mem::replace(&mut tree.slots, slots);
        drop(tree);
    }

    fn attach(&self, selector: &str, event: &str, handler: Handler) -> usize {
        let Some(selector) = parse(selector) else {
            return 0;
        };

        let mut count = 0;

        for slot in self.tree.borrow_mut().slots.iter_mut() {
            if matches(&selector, &slot.node) {
                slot.listeners.push((event.to_owned(), handler.clone()));
                count += 1;
            }
        }

        count
    }

    fn emit(&self, signal: &str) {
        self.tree.borrow_mut().emitted.push(signal.to_owned());
    }

    fn attributes(&self) -> Attributes {
        self.tree.borrow().host.clone()
    }

    fn observe(&self, observed: &'static [&'static str], sink: AttributeSink) {
        self.tree.borrow_mut().observer = Some((observed, sink));
    }

    fn disconnect(&self) {
        let observer = self.tree.borrow_mut().observer.take();

        drop(observer);
    }
}

fn parse(selector: &str) -> Option<Selector> {
    let parsed = Selector::parse(selector);

    if parsed.is_none() {
        log::warn!("unsupported selector `{selector}`");
    }

    parsed
}

fn matches(selector: &Selector, node: &Node) -> bool {
    selector.matches(&node.tag, |name| node.attribute(name))
}

/// Elements whose content is raw text, not markup.
const RAW_TEXT: &[&str] = &["style", "script"];

/// Scan `markup` for start tags, in document order.
fn scan(markup: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        rest = &rest[start..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        if rest.starts_with("</") || rest.starts_with("<!") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
            continue;
        }

        let Some((node, after)) = start_tag(&rest[1..]) else {
            rest = &rest[1..];
            continue;
        };

        rest = after;

        if RAW_TEXT.contains(&node.tag.as_str()) {
            let close = format!("</{}", node.tag);

            rest = rest.find(&close).map_or("", |end| &rest[end..]);
        }

        nodes.push(node);
    }

    nodes
}

/// Parse a start tag following its `<`, returning the node and the remaining input.
fn start_tag(source: &str) -> Option<(Node, &str)> {
    let name_end = source
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-'))
        .unwrap_or(source.len());

    if name_end == 0 || !source.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        return None;
    }

    let tag = source[..name_end].to_ascii_lowercase();
    let mut rest = &source[name_end..];
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();

        if let Some(after) = rest.strip_prefix("/>").or_else(|| rest.strip_prefix('>')) {
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|ch: char| ch.is_whitespace() || matches!(ch, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();

        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();

                match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let inner = &after[1..];
                        let end = inner.find(quote).unwrap_or(inner.len());

                        rest = inner.get(end + 1..).unwrap_or("");
                        decode(&inner[..end])
                    }
                    _ => {
                        let end = after
                            .find(|ch: char| ch.is_whitespace() || ch == '>')
                            .unwrap_or(after.len());

                        rest = &after[end..];
                        decode(&after[..end])
                    }
                }
            }
            None => String::new(),
        };

        attributes.push((name, value));
    }

    let checked = attributes.iter().any(|(name, _)| name == "checked");

    Some((
        Node {
            tag,
            attributes,
            checked,
        },
        rest,
    ))
}

/// Resolve character references in an attribute value, the way a browser
/// parses it. Unknown or malformed references are kept as written.
fn decode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let resolved = rest.find(';').and_then(|end| {
            let ch = reference(&rest[1..end])?;

            Some((ch, end + 1))
        });

        match resolved {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn reference(name: &str) -> Option<char> {
    let code = match name {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" => return Some('\''),
        _ => name.strip_prefix('#')?,
    };

    let code = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };

    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn scan_start_tags() {
        let nodes = scan(
            r#"<style>li > a { color: red; } .x<y {}</style>
            <!-- <button>commented</button> -->
            <ul>
                <li class="active current"><input type="checkbox" id='a_0' checked>
                <a href=https://example.com target="_blank">A</a></li>
                <br/>
            </ul>"#,
        );

        let tags: Vec<_> = nodes.iter().map(Node::tag).collect();

        assert_eq!(tags, ["style", "ul", "li", "input", "a", "br"]);
        assert!(nodes[2].has_class("current"));
        assert_eq!(nodes[3].id(), Some("a_0"));
        assert!(nodes[3].checked());
        assert_eq!(nodes[4].attribute("href"), Some("https://example.com"));
        assert_eq!(nodes[4].attribute("target"), Some("_blank"));
    }

    #[test]
    fn attribute_values_are_decoded() {
        let nodes = scan(
            r#"<a id="a&amp;b" title='&lt;&quot;x&quot;&gt; &#39;y&#x27;' href=/?p=1&amp;q=2 data-raw="AT&T &bogus; &"></a>"#,
        );

        assert_eq!(nodes[0].id(), Some("a&b"));
        assert_eq!(nodes[0].attribute("title"), Some(r#"<"x"> 'y'"#));
        assert_eq!(nodes[0].attribute("href"), Some("/?p=1&q=2"));
        assert_eq!(nodes[0].attribute("data-raw"), Some("AT&T &bogus; &"));
    }

    #[test]
    fn commit_replaces_content_and_listeners() {
        let root = MemoryRoot::new();
        let hits = Rc::new(Cell::new(0));

        root.commit("<button>one</button><button>two</button>");

        let inner = hits.clone();
        let handler: Handler = Rc::new(move |_: &Event| inner.set(inner.get() + 1));

        assert_eq!(root.attach("button", "click", handler), 2);
        assert_eq!(root.listener_count(), 2);
        assert_eq!(root.dispatch("button", "click"), 2);
        assert_eq!(root.dispatch("button", "input"), 0);

        root.commit("<button>three</button>");

        assert_eq!(root.listener_count(), 0);
        assert_eq!(root.dispatch("button", "click"), 0);
        assert_eq!(hits.get(), 2);
        assert_eq!(root.commits(), 2);
    }

    #[test]
    fn toggle_flips_checked() {
        let root = MemoryRoot::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        root.commit(r#"<input type="checkbox" id="x">"#);

        let inner = seen.clone();
        root.attach("#x", "change", Rc::new(move |e: &Event| inner.borrow_mut().push(e.checked)));

        root.toggle("#x");
        root.toggle("#x");

        assert_eq!(*seen.borrow(), [true, false]);
    }

    #[test]
    fn listener_may_commit() {
        let root = MemoryRoot::new();

        root.commit("<button>old</button>");

        let inner = root.clone();
        root.attach("button", "click", Rc::new(move |_: &Event| inner.commit("<p>new</p>")));

        assert_eq!(root.dispatch("button", "click"), 1);
        assert_eq!(root.markup(), "<p>new</p>");
    }

    #[test]
    fn host_attribute_changes() {
        let root = MemoryRoot::with_attributes([("title", "Intro")]);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = seen.clone();
        root.observe(
            &["title"],
            Rc::new(move |name: &str, old: Option<&str>, new: Option<&str>| {
                inner.borrow_mut().push((name.to_owned(), old.map(str::to_owned), new.map(str::to_owned)))
            }),
        );

        root.set_attribute("title", Some("Outro"));
        root.set_attribute("width", Some("100"));

        assert_eq!(
            *seen.borrow(),
            [("title".to_owned(), Some("Intro".to_owned()), Some("Outro".to_owned()))]
        );
        assert_eq!(root.attributes().get("width"), Some("100"));
    }
}
