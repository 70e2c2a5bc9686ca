// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A cookie-consent banner pinned to the bottom of the page.
//!
//! This is plain DOM scripting and doesn't go through the component engine: the
//! banner is created once, and removing it from view is the only interaction.
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use kiln::render::Escape;
use kiln::MountError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDocument, HtmlElement};

/// Name of the cookie remembering that the banner was dismissed.
pub const COOKIE_NAME: &str = "cookieBannerDismissed";

const WRAPPER_STYLE: &str = "
    font-size: 0.6rem;
    background-color: #ddd;
    color: #444;
    width: 100%;
    text-align: center;
    padding: 10px;
    position: fixed;
    bottom: 0;
    left: 0;";

const SPACER_STYLE: &str = "height: 106px;";

const LINK_STYLE: &str = "
    margin-top: 6px;
    padding: 4px;
    border: 1px solid #444;
    display: inline-block;
    cursor: pointer;";

/// Where the dismissal is remembered, under the flag `name`.
pub trait ConsentStore {
    fn dismissed(&self, name: &str) -> bool;

    fn dismiss(&self, name: &str);
}

/// Value of cookie `name` in a `document.cookie` string. Empty values count as absent.
pub fn read_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim_start().strip_prefix(name)?.strip_prefix('='))
        .find(|value| !value.is_empty())
}

/// Keeps the flag in `document.cookie`.
pub struct CookieStore {
    document: HtmlDocument,
}

impl CookieStore {
    /// `None` if `document` isn't an HTML document and has no cookies.
    pub fn new(document: &Document) -> Option<Self> {
        let document = document.dyn_ref::<HtmlDocument>()?.clone();

        Some(CookieStore { document })
    }
}

impl ConsentStore for CookieStore {
    fn dismissed(&self, name: &str) -> bool {
        match self.document.cookie() {
            Ok(cookies) => read_cookie(&cookies, name).is_some(),
            Err(err) => {
                log::warn!("could not read cookies: {err:?}");
                false
            }
        }
    }

    fn dismiss(&self, name: &str) {
        if let Err(err) = self.document.set_cookie(&format!("{name}=true")) {
            log::warn!("could not persist banner dismissal: {err:?}");
        }
    }
}

/// Keeps the flag in memory, forgotten on reload.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dismissed: RefCell<BTreeSet<String>>,
}

impl ConsentStore for MemoryStore {
    fn dismissed(&self, name: &str) -> bool {
        self.dismissed.borrow().contains(name)
    }

    fn dismiss(&self, name: &str) {
        self.dismissed.borrow_mut().insert(name.to_owned());
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cookie: Cow<'static, str>,
    pub text: Cow<'static, str>,
    pub privacy_url: Cow<'static, str>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cookie: Cow::Borrowed(COOKIE_NAME),
            text: Cow::Borrowed(
                "In order to optimize our website for you we use cookies and analysis tools. \
                 By continuing to use the website, you consent to the use of cookies.",
            ),
            privacy_url: Cow::Borrowed("/privacy"),
        }
    }
}

pub struct CookieBanner<S> {
    config: Config,
    store: Rc<S>,
}

impl<S: ConsentStore + 'static> CookieBanner<S> {
    pub fn new(config: Config, store: S) -> Self {
        CookieBanner {
            config,
            store: Rc::new(store),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn should_show(&self) -> bool {
        !self.store.dismissed(&self.config.cookie)
    }

    /// Remember that the banner was dismissed.
    pub fn dismiss(&self) {
        self.store.dismiss(&self.config.cookie);
    }

    /// Content of the banner's paragraph.
    pub fn text_markup(&self) -> String {
        format!(
            r#"{} For more information, please see our <a href="{}">Privacy Policy</a>."#,
            Escape(&self.config.text),
            Escape(&self.config.privacy_url),
        )
    }

    /// Append the banner and its spacer to the body, unless it was dismissed before.
    /// Returns whether the banner was shown.
    pub fn show(&self, document: &Document) -> Result<bool, MountError> {
        if !self.should_show() {
            log::debug!("cookie banner dismissed before, not showing");

            return Ok(false);
        }

        let body = document.body().ok_or(MountError::NoDocument)?;

        let wrapper = create(document, "div", WRAPPER_STYLE)?;
        let spacer = create(document, "div", SPACER_STYLE)?;
        let text = document.create_element("p")?;
        let link = create(document, "a", LINK_STYLE)?;

        wrapper.set_id("cookieBanner");
        spacer.set_id("cookieBannerSpacer");
        text.set_inner_html(&self.text_markup());
        link.set_text_content(Some("Ok"));

        let store = self.store.clone();
        let cookie = self.config.cookie.clone();
        let hidden = [wrapper.clone(), spacer.clone()];
        let on_click = Closure::<dyn FnMut()>::new(move || {
            store.dismiss(&cookie);

            for el in &hidden {
                if let Err(err) = el.style().set_property("display", "none") {
                    log::warn!("could not hide cookie banner: {err:?}");
                }
            }
        });

        link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        // The banner lives as long as the page
        on_click.forget();

        wrapper.append_child(&text)?;
        wrapper.append_child(&link)?;
        body.append_child(&wrapper)?;
        body.append_child(&spacer)?;

        Ok(true)
    }
}

impl CookieBanner<CookieStore> {
    /// Banner remembering its dismissal in the cookies of `document`.
    pub fn with_cookies(document: &Document, config: Config) -> Option<Self> {
        CookieStore::new(document).map(|store| CookieBanner::new(config, store))
    }
}

fn create(document: &Document, tag: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element(tag)?.unchecked_into();

    el.style().set_css_text(style);

    Ok(el)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_cookies() {
        let cookies = "theme=dark; cookieBannerDismissed=true; other=1";

        assert_eq!(read_cookie(cookies, COOKIE_NAME), Some("true"));
        assert_eq!(read_cookie(cookies, "theme"), Some("dark"));
        assert_eq!(read_cookie(cookies, "missing"), None);
        assert_eq!(read_cookie("", COOKIE_NAME), None);
        assert_eq!(read_cookie("cookieBannerDismissed=", COOKIE_NAME), None);
        assert_eq!(read_cookie("xcookieBannerDismissed=true", COOKIE_NAME), None);
        assert_eq!(read_cookie("cookieBannerDismissedAt=1", COOKIE_NAME), None);
    }

    #[test]
    fn dismissal_hides_banner() {
        let banner = CookieBanner::new(Config::default(), MemoryStore::default());

        assert!(banner.should_show());

        banner.dismiss();

        assert!(!banner.should_show());
        assert!(banner.store().dismissed(COOKIE_NAME));
    }

    #[test]
    fn flag_name_comes_from_config() {
        let store = MemoryStore::default();

        store.dismiss(COOKIE_NAME);

        let banner = CookieBanner::new(
            Config {
                cookie: "consentGiven".into(),
                ..Config::default()
            },
            store,
        );

        assert!(banner.should_show());

        banner.dismiss();

        assert!(!banner.should_show());
        assert!(banner.store().dismissed("consentGiven"));
    }

    #[test]
    fn text_links_privacy_policy() {
        let banner = CookieBanner::new(
            Config {
                text: "Cookies & more.".into(),
                privacy_url: "/datenschutz".into(),
                ..Config::default()
            },
            MemoryStore::default(),
        );

        let text = banner.text_markup();

        assert!(text.starts_with("Cookies &amp; more."));
        assert!(text.contains(r#"<a href="/datenschutz">Privacy Policy</a>"#));
        assert_eq!(banner.config().cookie, COOKIE_NAME);
    }
}
