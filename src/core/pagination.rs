//! Page envelope assembly: page metadata, display bounds and navigation links.

use crate::core::query::QueryRequest;
use crate::models::Entry;
use serde::{Deserialize, Serialize};

/// Pages shown on each side of the current one in the link window.
pub const LINKS_ON_EACH_SIDE: u32 = 2;

pub const PREVIOUS_LABEL: &str = "« Previous";
pub const NEXT_LABEL: &str = "Next »";
pub const GAP_LABEL: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// None only for the `...` gap marker.
    pub url: Option<String>,
    pub label: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first item on this page, 0 when empty.
    pub from: u64,
    /// 1-based index of the last item on this page, 0 when empty.
    pub to: u64,
    pub last_page: u32,
}

impl PageMeta {
    pub fn compute(total: u64, requested_page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let pages = total.div_ceil(u64::from(per_page)).max(1);
        let last_page = u32::try_from(pages).unwrap_or(u32::MAX);
        let current_page = requested_page.clamp(1, last_page);

        let (from, to) = if total == 0 {
            (0, 0)
        } else {
            let start = u64::from(current_page - 1) * u64::from(per_page);
            (start + 1, (start + u64::from(per_page)).min(total))
        };

        Self {
            current_page,
            per_page,
            total,
            from,
            to,
            last_page,
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub items: Vec<Entry>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub links: Vec<PageLink>,
    pub path: String,
    pub first_page_url: String,
    pub last_page_url: String,
    pub prev_page_url: Option<String>,
    pub next_page_url: Option<String>,
}

impl PageEnvelope {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// URL of `page` that keeps every other field of `request`.
pub fn page_url(path: &str, request: &QueryRequest, page: u32) -> String {
    format!("{path}?{}", request.with_page(page).query_string())
}

/// First page, last page and the pages around `current`. `None` marks a gap
/// of two or more pages; a single skipped page is shown instead of a gap.
pub fn page_window(current: u32, last: u32) -> Vec<Option<u32>> {
    let lo = current.saturating_sub(LINKS_ON_EACH_SIDE).max(1);
    let hi = current.saturating_add(LINKS_ON_EACH_SIDE).min(last);

    let mut pages: Vec<u32> = vec![1];
    pages.extend(lo..=hi);
    pages.push(last);
    pages.sort_unstable();
    pages.dedup();

    let mut out = Vec::with_capacity(pages.len() + 2);
    let mut prev: Option<u32> = None;
    for p in pages {
        if let Some(q) = prev {
            match p - q {
                1 => {}
                2 => out.push(Some(q + 1)),
                _ => out.push(None),
            }
        }
        out.push(Some(p));
        prev = Some(p);
    }
    out
}

pub fn build_links(path: &str, request: &QueryRequest, meta: &PageMeta) -> Vec<PageLink> {
    let mut links = Vec::new();

    if meta.has_previous() {
        links.push(PageLink {
            url: Some(page_url(path, request, meta.current_page - 1)),
            label: PREVIOUS_LABEL.to_string(),
            is_current: false,
        });
    }

    for slot in page_window(meta.current_page, meta.last_page) {
        links.push(match slot {
            Some(p) => PageLink {
                url: Some(page_url(path, request, p)),
                label: p.to_string(),
                is_current: p == meta.current_page,
            },
            None => PageLink {
                url: None,
                label: GAP_LABEL.to_string(),
                is_current: false,
            },
        });
    }

    if meta.has_next() {
        links.push(PageLink {
            url: Some(page_url(path, request, meta.current_page + 1)),
            label: NEXT_LABEL.to_string(),
            is_current: false,
        });
    }

    links
}

pub fn assemble(items: Vec<Entry>, meta: PageMeta, request: &QueryRequest, path: &str) -> PageEnvelope {
    PageEnvelope {
        items,
        links: build_links(path, request, &meta),
        path: path.to_string(),
        first_page_url: page_url(path, request, 1),
        last_page_url: page_url(path, request, meta.last_page),
        prev_page_url: meta
            .has_previous()
            .then(|| page_url(path, request, meta.current_page - 1)),
        next_page_url: meta
            .has_next()
            .then(|| page_url(path, request, meta.current_page + 1)),
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_a_single_current_link() {
        let meta = PageMeta::compute(0, 4, 10);
        assert_eq!(meta.current_page, 1);
        assert_eq!(meta.last_page, 1);
        assert_eq!((meta.from, meta.to), (0, 0));

        let env = assemble(Vec::new(), meta, &QueryRequest::default(), "/list");
        assert_eq!(env.links.len(), 1);
        assert!(env.links[0].is_current);
        assert!(env.prev_page_url.is_none());
        assert!(env.next_page_url.is_none());
    }

    #[test]
    fn bounds_on_a_middle_page() {
        let meta = PageMeta::compute(3, 2, 1);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 3);
        assert_eq!((meta.from, meta.to), (2, 2));
        assert_eq!(meta.offset(), 1);
    }

    #[test]
    fn last_page_is_partial_and_page_is_clamped() {
        let meta = PageMeta::compute(23, 99, 10);
        assert_eq!(meta.current_page, 3);
        assert_eq!((meta.from, meta.to), (21, 23));
    }

    #[test]
    fn window_with_gaps() {
        assert_eq!(
            page_window(10, 20),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12), None, Some(20)]
        );
        assert_eq!(page_window(1, 3), vec![Some(1), Some(2), Some(3)]);
        // single skipped page is shown
        assert_eq!(
            page_window(5, 7),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]
        );
        assert_eq!(page_window(1, 1), vec![Some(1)]);
    }

    #[test]
    fn links_keep_the_filter_state() {
        let request = QueryRequest::from_query_string(
            "search=alice&status=Pending&sort_field=duration&sort_order=asc&per_page=5&page=2",
            10,
        );
        let meta = PageMeta::compute(12, request.page, request.per_page);
        let links = build_links("/list", &request, &meta);

        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec![PREVIOUS_LABEL, "1", "2", "3", NEXT_LABEL]);

        for link in &links {
            let url = link.url.as_deref().unwrap();
            let parsed = QueryRequest::from_url(url, 10);
            assert_eq!(parsed.with_page(request.page), request);
        }
        assert_eq!(links.iter().filter(|l| l.is_current).count(), 1);
    }
}
