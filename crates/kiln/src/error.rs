// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use wasm_bindgen::JsValue;

/// Error mounting a component into a browser document.
#[derive(Debug)]
pub enum MountError {
    /// There is no global `window`, we are not running in a browser.
    NoWindow,
    /// The `window` has no `document`.
    NoDocument,
    /// A DOM call threw, the message is the stringified JavaScript exception.
    Js(String),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MountError::NoWindow => f.write_str("no global window"),
            MountError::NoDocument => f.write_str("window has no document"),
            MountError::Js(msg) => write!(f, "DOM call failed: {msg}"),
        }
    }
}

impl std::error::Error for MountError {}

impl From<JsValue> for MountError {
    fn from(err: JsValue) -> Self {
        MountError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}
