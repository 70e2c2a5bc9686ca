// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deriving step status from the checked-item set
//!
//! Everything up to and including the first unchecked step is shown as in
//! progress, nothing beyond it is, even steps that have been checked.

use std::collections::BTreeSet;

/// Identifiers of the items that have been checked.
pub type CheckedSet = BTreeSet<String>;

const PREFIX: &str = "progress_item_";

/// Identifier of the item at `index` in the list with unique id `uid`.
pub fn item_id(uid: &str, index: usize) -> String {
    let mut buf = itoa::Buffer::new();
    let index = buf.format(index);
    let mut id = String::with_capacity(PREFIX.len() + uid.len() + 1 + index.len());

    id.push_str(PREFIX);
    id.push_str(uid);
    id.push('_');
    id.push_str(index);
    id
}

/// Status of a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// Completed or current.
    pub active: bool,
    /// The first incomplete step.
    pub current: bool,
}

/// Status of every step of a list, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    steps: Vec<Status>,
    current: Option<usize>,
}

impl Timeline {
    /// Derive the status of `len` steps of the list `uid`. Only identifiers
    /// [`item_id`](item_id) produces for those steps are consulted.
    pub fn derive(len: usize, checked: &CheckedSet, uid: &str) -> Self {
        let mut steps = Vec::with_capacity(len);
        let mut current = None;

        for index in 0..len {
            if current.is_some() {
                steps.push(Status::default());
                continue;
            }

            let done = checked.contains(&item_id(uid, index));

            if !done {
                current = Some(index);
            }

            steps.push(Status {
                active: true,
                current: !done,
            });
        }

        Timeline { steps, current }
    }

    /// Index of the current step, `None` if the list is empty or all steps are done.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Status of step `index`; steps past the end are neither active nor current.
    pub fn status(&self, index: usize) -> Status {
        self.steps.get(index).copied().unwrap_or_default()
    }

    pub fn active_count(&self) -> usize {
        self.steps.iter().filter(|s| s.active).count()
    }

    pub fn current_count(&self) -> usize {
        self.steps.iter().filter(|s| s.current).count()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        self.steps.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(uid: &str, indices: &[usize]) -> CheckedSet {
        indices.iter().map(|&i| item_id(uid, i)).collect()
    }

    fn active(timeline: &Timeline) -> Vec<usize> {
        timeline
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn identifiers() {
        assert_eq!(item_id("1", 0), "progress_item_1_0");
        assert_eq!(item_id("intro", 12), "progress_item_intro_12");
    }

    #[test]
    fn walkthrough() {
        let none = Timeline::derive(3, &CheckedSet::new(), "1");

        assert_eq!(none.current(), Some(0));
        assert_eq!(active(&none), [0]);

        let first = Timeline::derive(3, &checked("1", &[0]), "1");

        assert_eq!(first.current(), Some(1));
        assert_eq!(active(&first), [0, 1]);

        let all = Timeline::derive(3, &checked("1", &[0, 1, 2]), "1");

        assert_eq!(all.current(), None);
        assert_eq!(active(&all), [0, 1, 2]);

        let gap = Timeline::derive(3, &checked("1", &[0, 2]), "1");

        assert_eq!(gap.current(), Some(1));
        assert_eq!(active(&gap), [0, 1]);
        assert_eq!(gap.status(2), Status::default());
    }

    #[test]
    fn empty_list() {
        let timeline = Timeline::derive(0, &checked("1", &[0, 1]), "1");

        assert!(timeline.is_empty());
        assert_eq!(timeline.current(), None);
        assert_eq!(timeline.active_count(), 0);
        assert_eq!(timeline.current_count(), 0);
    }

    #[test]
    fn foreign_identifiers_are_ignored() {
        let mut set = checked("2", &[0, 1]);

        set.insert("progress_item_1_7".into());
        set.insert("something else".into());

        let timeline = Timeline::derive(2, &set, "1");

        assert_eq!(timeline.current(), Some(0));
        assert_eq!(timeline.active_count(), 1);
    }

    #[test]
    fn derivation_is_idempotent() {
        let set = checked("x", &[0, 1, 3]);

        assert_eq!(Timeline::derive(5, &set, "x"), Timeline::derive(5, &set, "x"));
    }

    #[test]
    fn checking_is_monotonic() {
        let len = 6;

        // Every subset of checked steps, then every step added on top of it
        for mask in 0u32..(1 << len) {
            let base: Vec<usize> = (0..len).filter(|i| mask & (1 << i) != 0).collect();
            let before = Timeline::derive(len, &checked("m", &base), "m");

            assert!(before.current_count() <= 1);

            for extra in 0..len {
                let mut more = checked("m", &base);

                more.insert(item_id("m", extra));

                let after = Timeline::derive(len, &more, "m");

                assert!(after.active_count() >= before.active_count());
                assert!(after.current_count() <= 1);
            }
        }
    }
}
