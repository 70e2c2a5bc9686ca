// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host element attributes as seen by a component's template.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current attribute values of a component's host element.
///
/// Names are stored lowercased, lookups are ASCII case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attributes {
    map: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of attribute `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&normalize(name)).map(String::as_str)
    }

    /// Value of attribute `name`, or `default` if absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set `name` to `value`, or remove it when `value` is `None`. Returns the previous value.
    pub fn apply(&mut self, name: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(value) => self.map.insert(normalize(name), value.to_owned()),
            None => self.map.remove(&normalize(name)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes {
            map: iter
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), v.into()))
                .collect(),
        }
    }
}

/// Whether `name` is on the `observed` list.
pub fn is_observed(observed: &[&str], name: &str) -> bool {
    observed.iter().any(|o| o.eq_ignore_ascii_case(name))
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}
