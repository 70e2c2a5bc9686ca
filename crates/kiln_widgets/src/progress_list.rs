// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # `<progress-list>`
//!
//! A stepped timeline of linked items, each with a checkbox. Checking items moves the
//! "current" marker to the first unchecked step.
//!
//! Signals:
//!
//! * [`READY`](kiln::signal::READY) on every connection.
//! * [`LIST_CHANGE`](LIST_CHANGE) whenever a checkbox is toggled. It carries no
//!   payload, re-read [`ProgressState`](ProgressState) to persist the change.
//!
//! `items`, `checked_items` and `uid` can be written from outside at any time, and
//! render the same way as a checkbox toggle does.
use std::borrow::Cow;

use kiln::prelude::*;
use kiln::render::Escape;
use serde::{Deserialize, Serialize};

mod timeline;

pub use timeline::{item_id, CheckedSet, Status, Timeline};

/// Emitted after every checkbox toggle.
pub const LIST_CHANGE: &str = "list-change";

/// A step of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
    #[serde(rename = "labelURL")]
    pub label_url: String,
}

impl Item {
    pub fn new(label: impl Into<String>, label_url: impl Into<String>) -> Self {
        Item {
            label: label.into(),
            label_url: label_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub items: Vec<Item>,
    #[serde(rename = "checkedItems")]
    pub checked_items: CheckedSet,
    /// Disambiguates identifiers when several lists share a page.
    pub uid: String,
}

impl Default for ProgressState {
    fn default() -> Self {
        ProgressState {
            items: Vec::new(),
            checked_items: CheckedSet::new(),
            uid: "1".into(),
        }
    }
}

pub struct ProgressList;

impl ProgressList {
    /// Check or uncheck the item identified by `id`, writing the new set to `state`.
    /// Returns whether the set changed.
    pub fn toggle(state: &Observable<ProgressState>, id: &str, checked: bool) -> bool {
        let mut next = state.get(|s| &s.checked_items);

        if checked {
            next.insert(id.to_owned());
        } else {
            next.remove(id);
        }

        state.set(|s| &mut s.checked_items, next)
    }
}

const STYLE_HOOKS: &[StyleHook] = &[
    StyleHook::new("--progress-list--color-highlight", "Navy"),
    StyleHook::new("--progress-list--color-link", "Navy"),
    StyleHook::new("--progress-list--color-border", "LightGray"),
    StyleHook::new("--progress-list--color-bg", "white"),
];

const CSS: &str = r#"
    :host { display: block; }
    :host * { box-sizing: border-box; }

    ul {
      list-style: none;
      padding: 0;
    }
    li {
      display: flex;
      padding: 0;
    }
    li a {
      padding: .4rem 0;
      display: inline-block;
      flex-grow: 1;
      text-decoration: none;
      color: var(--progress-list--color-link, Navy);
    }

    .content {
      flex-grow: 1;
      border-bottom: 1px solid var(--progress-list--color-border, LightGray);
    }
    .timeline {
      flex-shrink: 0;
      flex-grow: 0;
      position: relative;
    }
    .timeline__line {
      background-color: var(--progress-list--color-border, LightGray);
      width: 4px;
      height: 100%;
      margin: 0 10px;
    }
    .timeline__insert {
      margin-left: 16px;
    }
    .timeline__item {
      display: flex;
      align-items: center;
      transition: all .4s;
    }
    .timeline__item:hover {
      background-color: var(--progress-list--color-highlight, Navy);
    }
    .timeline__item:hover a {
      color: white;
    }

    .timeline__dot {
      transform: scale(1.4);
      appearance: none;
      background-color: var(--progress-list--color-bg, white);
      border: 2px solid var(--progress-list--color-border, LightGray);
      border-radius: 50%;
      height: 16px;
      width: 16px;
      cursor: pointer;
      position: relative;
      z-index: 1;
      margin: 0 20px 0 -20px;
    }
    .timeline__dot:checked {
      background-color: var(--progress-list--color-highlight, Navy);
      border-color: var(--progress-list--color-highlight, Navy);
    }

    .current .timeline__dot::after {
      content: "";
      position: absolute;
      top: -5px;
      left: -5px;
      right: -5px;
      bottom: -5px;
      border-radius: 50%;
      border: 10px solid var(--progress-list--color-highlight, Navy);
      opacity: 0;
      animation: timeline_pulse 1.8s infinite;
    }
    .active .timeline__line {
      background-color: var(--progress-list--color-highlight, Navy);
    }
    .active .timeline__dot {
      border-color: var(--progress-list--color-highlight, Navy);
    }

    @keyframes timeline_pulse {
      0% { transform: scale(1); opacity: 0.7; }
      50% { transform: scale(1.5); opacity: 0; }
      100% { transform: scale(2); opacity: 0; }
    }
"#;

impl Component for ProgressList {
    const TAG: &'static str = "progress-list";

    type State = ProgressState;

    fn init(&self) -> ProgressState {
        ProgressState::default()
    }

    fn template(&self, state: &ProgressState, _: &Attributes) -> String {
        let timeline = Timeline::derive(state.items.len(), &state.checked_items, &state.uid);
        let uid = Escape(&state.uid);

        let mut out = String::from("<ul>");

        for ((idx, item), status) in state.items.iter().enumerate().zip(timeline.iter()) {
            let id = item_id(&state.uid, idx);
            let class = match (status.active, status.current) {
                (true, true) => "active current",
                (true, false) => "active",
                _ => "",
            };
            let checked = if state.checked_items.contains(&id) {
                " checked"
            } else {
                ""
            };

            out.push_str(&format!(
                r#"<li class="{class}">
                    <div aria-hidden="true" class="timeline">
                        <div aria-hidden="true" class="timeline__line"></div>
                    </div>
                    <div class="content">
                        <div class="timeline__item">
                            <input class="timeline__dot" type="checkbox" name="progress_item_{uid}_{name}" id="{id}"{checked}>
                            <a href="{href}" target="_blank">{label}</a>
                        </div>
                        <div class="timeline__insert">
                            <slot name="{idx}"></slot>
                            <slot name="0"></slot>
                        </div>
                    </div>
                </li>"#,
                name = idx + 1,
                id = Escape(&id),
                href = Escape(&item.label_url),
                label = Escape(&item.label),
            ));
        }

        out.push_str("</ul>");
        out
    }

    fn css(&self) -> Cow<'static, str> {
        Cow::Borrowed(CSS)
    }

    fn style_hooks(&self) -> &'static [StyleHook] {
        STYLE_HOOKS
    }

    fn listen(&self, bind: &mut Binder<Self>) {
        bind.on(r#"input[type="checkbox"]"#, "change", |list, event| {
            if let Some(id) = event.id.as_deref() {
                ProgressList::toggle(list.state(), id, event.checked);
            }

            list.emit(LIST_CHANGE);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn abc() -> Vec<Item> {
        ["A", "B", "C"]
            .into_iter()
            .map(|label| Item::new(label, format!("https://example.com/{label}")))
            .collect()
    }

    fn list() -> (Element<ProgressList>, MemoryRoot) {
        let root = MemoryRoot::new();
        let list = Element::build(ProgressList, root.clone());

        list.state().set(|s| &mut s.items, abc());

        (list, root)
    }

    fn classes(root: &MemoryRoot) -> Vec<String> {
        root.select("li")
            .iter()
            .map(|li| li.attribute("class").unwrap_or("").to_owned())
            .collect()
    }

    #[test]
    fn empty_list_renders() {
        let root = MemoryRoot::new();
        let _list = Element::build(ProgressList, root.clone());

        assert!(root.markup().ends_with("<ul></ul>"));
        assert_eq!(root.listener_count(), 0);
    }

    #[test]
    fn markup_per_item() {
        let (_list, root) = list();

        let boxes = root.select(r#"input[type="checkbox"]"#);
        let ids: Vec<_> = boxes.iter().map(|b| b.id().unwrap()).collect();

        assert_eq!(ids, ["progress_item_1_0", "progress_item_1_1", "progress_item_1_2"]);
        assert_eq!(boxes[0].attribute("name"), Some("progress_item_1_1"));
        assert_eq!(root.select("a")[1].attribute("href"), Some("https://example.com/B"));
        assert_eq!(root.select(r#"slot[name="2"]"#).len(), 1);
        assert_eq!(classes(&root), ["active current", "", ""]);
        assert_eq!(root.listener_count(), 3);
    }

    #[test]
    fn toggling_moves_current() {
        let (list, root) = list();
        let changes = Rc::new(Cell::new(0));

        let inner = changes.clone();
        list.on(LIST_CHANGE, move |_| inner.set(inner.get() + 1));

        root.toggle("#progress_item_1_0");
        assert_eq!(classes(&root), ["active", "active current", ""]);

        root.toggle("#progress_item_1_1");
        root.toggle("#progress_item_1_2");
        assert_eq!(classes(&root), ["active", "active", "active"]);
        assert_eq!(root.select("[checked]").len(), 3);

        root.toggle("#progress_item_1_1");
        assert_eq!(classes(&root), ["active", "active current", ""]);

        let state = list.state().read();

        assert_eq!(
            state.checked_items,
            CheckedSet::from([item_id("1", 0), item_id("1", 2)])
        );
        assert_eq!(changes.get(), 4);
        assert_eq!(root.emitted(), [LIST_CHANGE; 4]);
    }

    #[test]
    fn one_mutation_per_click_after_rerenders() {
        let (list, root) = list();

        for _ in 0..4 {
            list.state().set(|s| &mut s.items, abc().into_iter().rev().collect());
            list.state().set(|s| &mut s.items, abc());
        }

        let renders = list.renders();

        assert_eq!(root.toggle("#progress_item_1_0"), 1);
        assert_eq!(list.renders(), renders + 1);
        assert_eq!(root.listener_count(), 3);
    }

    #[test]
    fn external_writes_render() {
        let (list, root) = list();

        list.state().set(|s| &mut s.checked_items, CheckedSet::from([item_id("1", 0)]));

        assert_eq!(classes(&root), ["active", "active current", ""]);

        list.state().set(|s| &mut s.uid, "2".into());

        // Old identifiers no longer match, nothing is checked anymore
        assert_eq!(classes(&root), ["active current", "", ""]);
        assert_eq!(root.select("#progress_item_2_0").len(), 1);
        assert_eq!(list.state().read().checked_items.len(), 1);
    }

    #[test]
    fn instances_keep_separate_timelines() {
        let (first, first_root) = list();
        let (second, second_root) = list();

        second.state().set(|s| &mut s.uid, "2".into());
        first_root.toggle("#progress_item_1_0");

        assert_eq!(classes(&first_root), ["active", "active current", ""]);
        assert_eq!(classes(&second_root), ["active current", "", ""]);
        assert!(second.state().read().checked_items.is_empty());
        assert_eq!(first.state().read().checked_items.len(), 1);
    }

    #[test]
    fn uid_with_markup_characters() {
        let (list, root) = list();

        list.state().update(|s| {
            s.uid = "a&b".into();
            s.items.truncate(2);
        });

        let ids: Vec<_> = root
            .select("input")
            .iter()
            .map(|b| b.id().unwrap().to_owned())
            .collect();

        assert_eq!(ids, [item_id("a&b", 0), item_id("a&b", 1)]);

        root.toggle("input");

        assert_eq!(
            list.state().read().checked_items,
            CheckedSet::from([item_id("a&b", 0), item_id("a&b", 1)])
        );
        assert_eq!(classes(&root), ["active", "active"]);
    }

    #[test]
    fn labels_are_escaped() {
        let root = MemoryRoot::new();
        let list = Element::build(ProgressList, root.clone());

        list.state().set(|s| &mut s.items, vec![Item::new("<b>bold</b>", "\"><script>")]);

        let markup = root.markup();

        assert!(markup.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!markup.contains("<script>"));
    }

    #[test]
    fn style_hooks_appear_in_css() {
        let css = ProgressList.css();

        for hook in ProgressList.style_hooks() {
            assert!(css.contains(&hook.to_string()), "{}", hook.name);
        }
    }

    #[test]
    fn state_serializes_with_host_names() {
        let state = ProgressState {
            items: vec![Item::new("A", "/a")],
            checked_items: CheckedSet::from([item_id("1", 0)]),
            uid: "1".into(),
        };

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "items": [{ "label": "A", "labelURL": "/a" }],
                "checkedItems": ["progress_item_1_0"],
                "uid": "1",
            })
        );

        let partial: ProgressState = serde_json::from_str(r#"{ "checkedItems": ["x"] }"#).unwrap();

        assert_eq!(partial.uid, "1");
        assert!(partial.items.is_empty());
    }
}
