//! Coarse handler priority for hosts that order endpoints before negotiation.
//!
//! A handler with a non-empty declaration sorts before one without. No subset
//! matching happens here.

use crate::routes::{HandlerMeta, HandlerRef};
use std::cmp::Ordering;

/// Compare two handlers by whether they declare content types.
///
/// Empty and absent declarations compare equal.
#[must_use]
pub fn compare(a: &HandlerMeta, b: &HandlerMeta) -> Ordering {
    // `true` must sort first, so compare b against a
    b.has_declared_content_types()
        .cmp(&a.has_declared_content_types())
}

/// Stable sort, declared handlers first.
pub fn sort_by_priority(handlers: &mut [HandlerRef]) {
    handlers.sort_by(|a, b| compare(a, b));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::declaration::ProducesDeclaration;
    use http::Method;
    use std::sync::Arc;

    fn meta(name: &str, types: Option<&[&str]>) -> HandlerMeta {
        let meta = HandlerMeta::new(name, Method::GET, "/");
        match types {
            Some(types) => meta.with_produces(ProducesDeclaration::new(types.iter().copied()).unwrap()),
            None => meta,
        }
    }

    #[test]
    fn test_declared_sorts_first() {
        let declared = meta("a", Some(&["text/html"]));
        let bare = meta("b", None);
        assert_eq!(compare(&declared, &bare), Ordering::Less);
        assert_eq!(compare(&bare, &declared), Ordering::Greater);
    }

    #[test]
    fn test_empty_and_absent_are_equal() {
        assert_eq!(compare(&meta("a", Some(&[])), &meta("b", None)), Ordering::Equal);
        assert_eq!(compare(&meta("a", None), &meta("b", None)), Ordering::Equal);
        assert_eq!(
            compare(&meta("a", Some(&["text/html"])), &meta("b", Some(&["application/json"]))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let mut handlers: Vec<HandlerRef> = vec![
            Arc::new(meta("bare1", None)),
            Arc::new(meta("json", Some(&["application/json"]))),
            Arc::new(meta("bare2", Some(&[]))),
            Arc::new(meta("html", Some(&["text/html"]))),
        ];
        sort_by_priority(&mut handlers);
        let names: Vec<&str> = handlers.iter().map(|h| &*h.name).collect();
        assert_eq!(names, ["json", "html", "bare1", "bare2"]);
    }
}
