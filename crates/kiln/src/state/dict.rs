// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::state::Observable;

/// Open-ended record for components whose state shape is not fixed up front.
///
/// Missing keys read as [`Value::Null`](Value::Null), and writing a key that isn't
/// present extends the record.
pub type Dict = BTreeMap<String, Value>;

impl Observable<Dict> {
    /// Write a single key, notifying if the value changed or the key is new.
    pub fn insert(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();

        self.update(move |dict| match dict.get(key) {
            Some(old) if *old == value => false,
            _ => {
                dict.insert(key.to_owned(), value);
                true
            }
        })
    }

    /// Clone the value stored under `key`, or `Null` if there is none.
    pub fn value(&self, key: &str) -> Value {
        self.with(|dict| dict.get(key).cloned().unwrap_or(Value::Null))
    }

    /// Read `key` as a string, empty when missing or not a string.
    pub fn text(&self, key: &str) -> String {
        self.with(|dict| text(dict, key).to_owned())
    }
}

/// Read `key` out of a dictionary as a string slice, empty when missing.
pub fn text<'a>(dict: &'a Dict, key: &str) -> &'a str {
    dict.get(key).and_then(Value::as_str).unwrap_or("")
}
