// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// A compound CSS selector: `tag`, `#id`, `.class`, `[attr]` and `[attr="value"]`
/// parts in any combination, without combinators or pseudo-classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

impl Selector {
    /// Parse `source`, returning `None` for anything outside the supported subset.
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        let mut rest = source;

        let tag = match take_ident(rest) {
            ("", _) => {
                if let Some(after) = rest.strip_prefix('*') {
                    rest = after;
                }
                None
            }
            (ident, after) => {
                rest = after;
                Some(ident.to_ascii_lowercase())
            }
        };

        let mut parts = Vec::new();

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let (ident, after) = take_ident(&rest[1..]);

                    if ident.is_empty() {
                        return None;
                    }
                    parts.push(match first {
                        '#' => Part::Id(ident.to_owned()),
                        _ => Part::Class(ident.to_owned()),
                    });
                    rest = after;
                }
                '[' => {
                    let end = rest.find(']')?;
                    let inner = &rest[1..end];

                    parts.push(match inner.split_once('=') {
                        Some((name, value)) => {
                            Part::Attr(attr_name(name)?, Some(unquote(value.trim())?.to_owned()))
                        }
                        None => Part::Attr(attr_name(inner)?, None),
                    });
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        if tag.is_none() && parts.is_empty() && !source.starts_with('*') {
            return None;
        }

        Some(Selector { tag, parts })
    }

    /// Test an element given its tag name and an attribute lookup.
    pub fn matches<'a, F>(&self, tag: &str, attr: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        self.parts.iter().all(|part| match part {
            Part::Id(id) => attr("id") == Some(id.as_str()),
            Part::Class(class) => attr("class")
                .map_or(false, |list| list.split_ascii_whitespace().any(|c| c == class.as_str())),
            Part::Attr(name, None) => attr(name.as_str()).is_some(),
            Part::Attr(name, Some(value)) => attr(name.as_str()) == Some(value.as_str()),
        })
    }
}

fn is_ident(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(source: &str) -> (&str, &str) {
    let end = source.find(|ch| !is_ident(ch)).unwrap_or(source.len());

    source.split_at(end)
}

fn attr_name(name: &str) -> Option<String> {
    let name = name.trim();

    if name.is_empty() || !name.chars().all(is_ident) {
        return None;
    }

    Some(name.to_ascii_lowercase())
}

fn unquote(value: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote) {
            return inner.strip_suffix(quote);
        }
    }

    value.chars().all(is_ident).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(attrs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> + 'a {
        move |name| attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[test]
    fn compound_selectors() {
        let attrs = [("type", "checkbox"), ("id", "item_1"), ("class", "timeline__dot big")];

        for source in [
            "input",
            "INPUT",
            "#item_1",
            ".timeline__dot",
            ".big.timeline__dot",
            "[type]",
            r#"input[type="checkbox"]"#,
            "input[type='checkbox']#item_1",
            "[type=checkbox]",
            "*",
        ] {
            let selector = Selector::parse(source).unwrap();

            assert!(selector.matches("input", lookup(&attrs)), "{source}");
        }

        for source in ["button", "#item_2", ".small", r#"input[type="radio"]"#, "[name]"] {
            let selector = Selector::parse(source).unwrap();

            assert!(!selector.matches("input", lookup(&attrs)), "{source}");
        }
    }

    #[test]
    fn unsupported_syntax() {
        for source in ["", "ul li", "ul > li", "a, b", "a:hover", "[type", "#", r#"[x="y]"#] {
            assert_eq!(Selector::parse(source), None, "{source}");
        }
    }
}
