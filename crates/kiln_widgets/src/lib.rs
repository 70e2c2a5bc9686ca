// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Kiln widgets
//!
//! Self-contained components built on [`kiln`](kiln), meant to be dropped into an
//! existing page:
//!
//! - [`ProgressList`](ProgressList): a stepped timeline of checkable items.
//! - [`YouTubeEmbed`](YouTubeEmbed): a video embed that loads nothing from YouTube
//!   until the user asks for it.
//! - [`ExampleFull`](ExampleFull) and [`ExampleSimple`](ExampleSimple): templates
//!   for new components.
//!
//! The [`cookie_banner`](cookie_banner) module is plain DOM scripting without a
//! component behind it.

pub mod cookie_banner;
pub mod example;
pub mod progress_list;
pub mod youtube_embed;

pub use example::{ExampleFull, ExampleSimple};
pub use progress_list::{Item, ProgressList, ProgressState};
pub use youtube_embed::YouTubeEmbed;
