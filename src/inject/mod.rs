//! HTML injection
//!
//! Inserts fragments into an HTML document as a pure function over bytes.
//! Insertion point, in priority order:
//! 1. right after the opening `<head>` tag, if the document has exactly one
//! 2. right after the opening `<body>` tag, if the document has exactly one
//! 3. before all existing content
//!
//! A document that already contains a fragment's marker is returned as is.

mod fragment;

use std::borrow::Cow;

pub use fragment::{Fragment, DEV_LOGGER_MARKER, LIVE_RELOAD_MARKER};

/// Inject one fragment, leaving already-processed documents untouched
pub fn inject<'a>(html: &'a [u8], fragment: &Fragment) -> Cow<'a, [u8]> {
    if contains(html, fragment.marker().as_bytes()) {
        return Cow::Borrowed(html);
    }

    let markup = fragment.markup().as_bytes();
    let mut out = Vec::with_capacity(html.len() + markup.len() + 1);

    match insertion_point(html) {
        Some(at) => {
            out.extend_from_slice(&html[..at]);
            out.push(b'\n');
            out.extend_from_slice(markup);
            out.extend_from_slice(&html[at..]);
        }
        None => {
            out.extend_from_slice(markup);
            out.extend_from_slice(html);
        }
    }

    Cow::Owned(out)
}

/// Inject several fragments in order
pub fn inject_all<'a>(html: &'a [u8], fragments: &[Fragment]) -> Cow<'a, [u8]> {
    fragments
        .iter()
        .fold(Cow::Borrowed(html), |doc, fragment| match doc {
            Cow::Borrowed(bytes) => inject(bytes, fragment),
            Cow::Owned(bytes) => Cow::Owned(inject(&bytes, fragment).into_owned()),
        })
}

fn insertion_point(html: &[u8]) -> Option<usize> {
    sole_tag_end(html, b"head").or_else(|| sole_tag_end(html, b"body"))
}

/// Byte offset just past the opening tag `name`, if it occurs exactly once
fn sole_tag_end(html: &[u8], name: &[u8]) -> Option<usize> {
    let mut ends = opening_tag_ends(html, name);
    let end = ends.next()?;
    if ends.next().is_some() {
        return None;
    }
    Some(end)
}

/// Offsets just past each complete opening tag `<name ...>`, tag name
/// compared ignoring ASCII case
///
/// Attributes are accepted (`<head lang="en">` counts as the head tag).
fn opening_tag_ends<'a>(html: &'a [u8], name: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    html.iter()
        .enumerate()
        .filter(|(_, b)| **b == b'<')
        .filter_map(move |(start, _)| {
            let name_end = start + 1 + name.len();
            let tag_name = html.get(start + 1..name_end)?;
            if !tag_name.eq_ignore_ascii_case(name) {
                return None;
            }
            // `<header>` is not `<head>`
            match *html.get(name_end)? {
                b'>' | b'/' => {}
                b if b.is_ascii_whitespace() => {}
                _ => return None,
            }
            let close = html[name_end..].iter().position(|b| *b == b'>')?;
            Some(name_end + close + 1)
        })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> Fragment {
        Fragment::new("<!-- test marker -->", "<script src=\"/x.js\"></script>")
    }

    fn injected(html: &str) -> String {
        String::from_utf8(inject(html.as_bytes(), &fragment()).into_owned()).unwrap()
    }

    #[test]
    fn test_inserts_after_head() {
        let out = injected("<html><head><title>t</title></head><body></body></html>");
        assert!(out.starts_with("<html><head>\n<!-- test marker -->"));
        assert!(out.ends_with("<title>t</title></head><body></body></html>"));
    }

    #[test]
    fn test_head_match_ignores_case_and_attributes() {
        let out = injected("<HTML><HEAD lang=\"en\"></HEAD></HTML>");
        assert!(out.starts_with("<HTML><HEAD lang=\"en\">\n<!-- test marker -->"));
    }

    #[test]
    fn test_header_element_is_not_head() {
        let out = injected("<body><header>nav</header></body>");
        assert!(out.starts_with("<body>\n<!-- test marker -->"));
    }

    #[test]
    fn test_falls_back_to_body() {
        let out = injected("<body><p>hi</p></body>");
        assert_eq!(
            out,
            "<body>\n<!-- test marker -->\n<script src=\"/x.js\"></script>\n<p>hi</p></body>"
        );
    }

    #[test]
    fn test_prepends_without_head_or_body() {
        let out = injected("<p>fragment only</p>");
        assert!(out.starts_with("<!-- test marker -->"));
        assert!(out.ends_with("<p>fragment only</p>"));
    }

    #[test]
    fn test_two_heads_fall_back_to_body() {
        let out = injected("<head></head><head></head><body></body>");
        assert!(out.starts_with("<head></head><head></head><body>\n<!-- test marker -->"));
    }

    #[test]
    fn test_two_heads_and_two_bodies_prepend() {
        let html = "<head><head><body><body>";
        let out = injected(html);
        assert!(out.starts_with("<!-- test marker -->"));
        assert!(out.ends_with(html));
    }

    #[test]
    fn test_idempotent() {
        let html = b"<html><head></head><body></body></html>";
        let once = inject(html, &fragment()).into_owned();
        let twice = inject(&once, &fragment());
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice.as_ref(), once.as_slice());
    }

    #[test]
    fn test_fragments_compose_in_either_order() {
        let html = b"<html><head></head><body></body></html>";
        let reload = Fragment::live_reload("localhost", 35729);
        let logger = Fragment::dev_logger("/__dev-server-assets", false, 53703);

        let a = inject_all(html, &[reload.clone(), logger.clone()]).into_owned();
        let b = inject_all(html, &[logger.clone(), reload.clone()]).into_owned();
        for doc in [&a, &b] {
            let text = String::from_utf8(doc.clone()).unwrap();
            assert_eq!(text.matches(LIVE_RELOAD_MARKER).count(), 1);
            assert_eq!(text.matches(DEV_LOGGER_MARKER).count(), 1);
        }

        // Reapplying the full set changes nothing
        let again = inject_all(&a, &[reload, logger]);
        assert_eq!(again.as_ref(), a.as_slice());
    }

    #[test]
    fn test_unterminated_tag_is_ignored() {
        let out = injected("<head");
        assert!(out.starts_with("<!-- test marker -->"));
        assert!(out.ends_with("<head"));
    }

    #[test]
    fn test_empty_document() {
        let out = injected("");
        assert_eq!(out, fragment().markup());
    }
}
