// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # `<youtube-embed>`
//!
//! Embeds a YouTube video, but doesn't put anything from YouTube into the page before
//! the user explicitly clicks "Play".
use std::borrow::Cow;

use kiln::prelude::*;
use kiln::render::Escape;

pub struct YouTubeEmbed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedState {
    /// The user has consented and the player is shown.
    pub playing: bool,
}

const STYLE_HOOKS: &[StyleHook] = &[
    StyleHook::new("--youtube-embed--background", "Grey"),
    StyleHook::new("--youtube-embed--button", "lightgray"),
    StyleHook::new("--youtube-embed--link", "lightyellow"),
];

const CSS: &str = "
    :host { display: block; }
    :host * { box-sizing: border-box; }

    .yt_embed__outer {
      max-width: 100%;
      position: relative;
      background: var(--youtube-embed--background, Grey);
      margin: 10px 0;
    }
    .yt_embed {
      position: relative;
      padding-bottom: 56.25%;
      padding-top: 0;
      height: 0;
      overflow: hidden;
      display: flex;
      align-items: center;
      justify-content: center;
      margin: 20px 0;
    }
    .yt_embed p {
      display: block;
      margin-top: 56.25%;
      text-align: center;
      color: white;
      padding: 20px;
    }
    .yt_embed p > * {
      display: block;
      margin: 10px;
    }
    .yt_embed a {
      color: var(--youtube-embed--link, lightyellow);
    }
    .yt_embed button {
      display: block;
      margin: auto;
      cursor: pointer;
      padding: 20px 50px;
      font-size: 3rem;
      border: 0;
      background: var(--youtube-embed--button, lightgray);
    }
    .yt_embed iframe {
      position: absolute;
      top: 0;
      left: 0;
      width: 100%;
      height: 100%;
    }
";

impl Component for YouTubeEmbed {
    const TAG: &'static str = "youtube-embed";
    const OBSERVED: &'static [&'static str] = &["videoId", "title", "width"];

    type State = EmbedState;

    fn init(&self) -> EmbedState {
        EmbedState::default()
    }

    fn template(&self, state: &EmbedState, attrs: &Attributes) -> String {
        let video = Escape(attrs.get_or("videoId", ""));
        let title = Escape(attrs.get_or("title", ""));

        let style = match attrs.get("width") {
            Some(width) => format!(r#" style="width: {}px;""#, Escape(width)),
            None => String::new(),
        };

        let content = if state.playing {
            format!(
                r#"<iframe width="560" height="315" src="https://www.youtube-nocookie.com/embed/{video}?autoplay=1&amp;rel=0" title="YouTube video player" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#
            )
        } else {
            format!(
                r#"<p>
                    <strong>{title}</strong>
                    <button name="Play" title="Play YouTube Video">&#9658;</button>
                    <small>By clicking "Play", you will open a YouTube Video and <a rel="noreferrer" href="https://policies.google.com/privacy" target="_blank">Google's privacy policy</a> applies.</small>
                </p>"#
            )
        };

        format!(
            r#"<div class="yt_embed__outer"{style}>
                <div id="video_{video}" class="yt_embed">{content}</div>
            </div>"#
        )
    }

    fn css(&self) -> Cow<'static, str> {
        Cow::Borrowed(CSS)
    }

    fn style_hooks(&self) -> &'static [StyleHook] {
        STYLE_HOOKS
    }

    fn listen(&self, bind: &mut Binder<Self>) {
        bind.on("button", "click", |embed, _| {
            log::debug!("playing video {:?}", embed.attributes().get("videoId"));

            embed.state().set(|s| &mut s.playing, true);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed() -> (Element<YouTubeEmbed>, MemoryRoot) {
        let root = MemoryRoot::with_attributes([("videoid", "dQw4w9WgXcQ"), ("title", "Intro")]);

        (Element::build(YouTubeEmbed, root.clone()), root)
    }

    #[test]
    fn nothing_external_before_play() {
        let (_embed, root) = embed();

        assert!(root.select("iframe").is_empty());
        assert!(!root.markup().contains("youtube-nocookie.com"));
        assert_eq!(root.select("#video_dQw4w9WgXcQ").len(), 1);
        assert!(root.markup().contains("<strong>Intro</strong>"));
        assert_eq!(root.select(".yt_embed__outer")[0].attribute("style"), None);
    }

    #[test]
    fn play_reveals_player() {
        let (embed, root) = embed();

        assert_eq!(root.dispatch("button", "click"), 1);
        assert!(embed.state().read().playing);

        let frames = root.select("iframe");

        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0].attribute("src"),
            Some("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0")
        );
        assert!(root.select("button").is_empty());
        assert_eq!(root.listener_count(), 0);
    }

    #[test]
    fn observed_attribute_changes_render() {
        let (embed, root) = embed();

        root.set_attribute("width", Some("640"));

        assert_eq!(embed.renders(), 2);
        assert_eq!(
            root.select(".yt_embed__outer")[0].attribute("style"),
            Some("width: 640px;")
        );

        root.set_attribute("width", Some("640"));
        root.set_attribute("class", Some("wide"));

        assert_eq!(embed.renders(), 2);
    }

    #[test]
    fn attributes_are_escaped() {
        let root = MemoryRoot::with_attributes([("title", "<img src=x onerror=alert(1)>")]);
        let _embed = Element::build(YouTubeEmbed, root.clone());

        assert!(root.select("img").is_empty());
    }
}
