use serde::Serialize;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Pager links for a list: page numbers with `None` marking an ellipsis.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub total_pages: usize,
    pub pages: Vec<Option<usize>>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl Pager {
    pub fn new(current_page: usize, total_count: usize, limit: usize) -> Self {
        let current_page = current_page.max(1);
        let total_pages = total_count.div_ceil(limit.max(1));
        // Pages past the end anchor the links on the last page.
        let anchor = current_page.min(total_pages.max(1));
        let pages = get_pages(total_pages, anchor, 2, 2, 4, 2);

        Self {
            page: current_page,
            total_pages,
            pages,
            prev: (current_page > 1).then(|| (current_page - 1).min(total_pages.max(1))),
            next: (current_page < total_pages).then(|| current_page + 1),
        }
    }
}
