// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gloo_storage::{LocalStorage, Storage};
use kiln::prelude::*;
use kiln_widgets::cookie_banner::{Config, CookieBanner};
use kiln_widgets::progress_list::{CheckedSet, LIST_CHANGE};
use kiln_widgets::{ExampleFull, ExampleSimple, Item, ProgressList, YouTubeEmbed};
use wasm_bindgen::UnwrapThrowExt;

const KEY: &str = "kiln.progress_list.demo";

fn storage_key(uid: &str) -> String {
    format!("{KEY}.{uid}")
}

fn items() -> Vec<Item> {
    vec![
        Item::new("Create an account", "#account"),
        Item::new("Verify your email", "#verify"),
        Item::new("Fill in your profile", "#profile"),
        Item::new("Invite your team", "#team"),
    ]
}

fn restore(list: &Element<ProgressList>, uid: String) {
    let key = storage_key(&uid);
    let checked = LocalStorage::get::<CheckedSet>(&key).unwrap_or_default();

    log::debug!("restored {} checked item(s) from {key}", checked.len());

    list.state().update(move |state| {
        state.uid = uid;
        state.items = items();
        state.checked_items = checked;
    });

    list.on(LIST_CHANGE, |list| {
        let (key, checked) = list
            .state()
            .with(|state| (storage_key(&state.uid), state.checked_items.clone()));

        if let Err(err) = LocalStorage::set(&key, &checked) {
            log::warn!("could not store progress: {err}");
        }
    });
}

fn main() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let mut next_uid = 0usize;
    let lists = kiln::define_with(
        || ProgressList,
        move |list| {
            next_uid += 1;
            restore(list, next_uid.to_string());
        },
    )
    .unwrap_throw();

    let embeds = kiln::define(|| YouTubeEmbed).unwrap_throw();
    let full = kiln::define_with(
        || ExampleFull,
        |example| {
            example.state().insert("greeting", "Hello from kiln 🔥!");
        },
    )
    .unwrap_throw();
    let simple = kiln::define(|| ExampleSimple).unwrap_throw();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .expect_throw("no document");

    match CookieBanner::with_cookies(&document, Config::default()) {
        Some(banner) => {
            banner.show(&document).unwrap_throw();
        }
        None => log::warn!("document has no cookies, skipping the banner"),
    }

    // Keep following the document for the lifetime of the page
    std::mem::forget((lists, embeds, full, simple));
}
