//! REST cursor extraction from the `Link` response header.
//!
//! Shopify's REST Admin API paginates with a header like:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/orders.json?limit=50&page_info=abc>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/orders.json?limit=50&page_info=def>; rel="next"
//! ```
//!
//! Entries may come in any order. Only the `rel="next"` entry matters here.

use receipt_desk_core::UpstreamPageInfo;
use url::Url;

const CURSOR_PARAM: &str = "page_info";

/// Extract continuation state from a `Link` header value.
///
/// No header, or no `rel="next"` entry, means the stream has ended. A
/// `next` entry whose URL carries no `page_info` still reports
/// `has_next_page` so the caller can decide what to do with the missing
/// cursor.
#[must_use]
pub fn parse_next(header: Option<&str>) -> UpstreamPageInfo {
    let Some(header) = header else {
        return UpstreamPageInfo::default();
    };

    links(header)
        .find(|(_, params)| is_next(params))
        .map(|(target, _)| UpstreamPageInfo {
            has_next_page: true,
            end_cursor: cursor_from_url(target),
        })
        .unwrap_or_default()
}

/// Iterate `(url, params)` pairs of a `Link` header.
///
/// Scans for `<...>` rather than splitting on commas, since a URL may
/// legitimately contain one.
fn links(header: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = header;
    std::iter::from_fn(move || {
        let open = rest.find('<')?;
        let after_open = rest.get(open + 1..)?;
        let close = after_open.find('>')?;
        let target = after_open.get(..close)?;
        let tail = after_open.get(close + 1..)?;
        let params_end = tail.find('<').unwrap_or(tail.len());
        let params = tail.get(..params_end)?;
        rest = tail.get(params_end..)?;
        Some((target.trim(), params))
    })
}

/// Whether a parameter list contains `rel="next"` (possibly among other
/// relation types, e.g. `rel="next last"`).
fn is_next(params: &str) -> bool {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case("rel"))
        .any(|(_, value)| {
            value
                .trim()
                .trim_end_matches(',')
                .trim_matches('"')
                .split_ascii_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case("next"))
        })
}

/// URL-decoded `page_info` of a link target. Relative targets are resolved
/// against a placeholder origin since only the query matters.
fn cursor_from_url(target: &str) -> Option<String> {
    let url = Url::parse(target).or_else(|_| {
        Url::parse("https://placeholder.invalid/").and_then(|base| base.join(target))
    });
    let url = match url {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(target, error = %e, "Unparseable Link header URL");
            return None;
        }
    };

    url.query_pairs()
        .find(|(key, _)| key == CURSOR_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
