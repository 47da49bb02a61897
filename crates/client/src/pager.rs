//! Numbered pager layout.

/// Pages shown on each side of the current one.
const WINDOW: u32 = 2;

/// One slot of a numbered pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: u32, current: bool },
    /// A run of hidden pages.
    Ellipsis,
}

/// Layout of a numbered pager: the first and last pages, the pages within
/// two of `current`, and an ellipsis for each gap.
///
/// A single page (or none) needs no pager and yields an empty layout.
pub fn page_window(current: u32, total: u32) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut links = Vec::new();
    let mut previous = 0;
    for number in 1..=total {
        let near = number.abs_diff(current) <= WINDOW;
        if number != 1 && number != total && !near {
            continue;
        }
        if number > previous + 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page {
            number,
            current: number == current,
        });
        previous = number;
    }
    links
}
