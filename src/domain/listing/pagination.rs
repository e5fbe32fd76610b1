//! Page state and the compressed page-number window

use serde::{Serialize, Serializer};

/// Widest window rendered without ellipses.
pub const MAX_VISIBLE_PAGES: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Navigation tokens keeping `current` centred between the first and last page.
/// `current` outside `1..=total` is treated as the nearest end.
pub fn page_window(current: u32, total: u32) -> Vec<PageToken> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageToken::Page).collect();
    }
    let current = current.clamp(1, total);
    let mut pages = vec![PageToken::Page(1)];
    if current > 3 { pages.push(PageToken::Ellipsis); }
    let start = current.saturating_sub(1).max(2);
    let end = (total - 1).min(current + 1);
    pages.extend((start..=end).map(PageToken::Page));
    if current < total - 2 { pages.push(PageToken::Ellipsis); }
    pages.push(PageToken::Page(total));
    pages
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageState {
    current: u32,
    per_page: u32,
    count: u64,
}

impl PageState {
    pub fn new(per_page: u32) -> Self { Self { current: 1, per_page: per_page.max(1), count: 0 } }

    pub fn current(&self) -> u32 { self.current }
    pub fn per_page(&self) -> u32 { self.per_page }
    pub fn count(&self) -> u64 { self.count }

    /// `ceil(count / per_page)`.
    pub fn total_pages(&self) -> u32 {
        let pages = self.count.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Moves to `page`; out-of-range requests are ignored and return `false`.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() { return false; }
        self.current = page;
        true
    }

    pub fn reset(&mut self) { self.current = 1; }

    /// Positions at `page` before the total is known.
    pub fn start_at(&mut self, page: u32) { self.current = page.max(1); }

    /// Records a fresh total, pulling the current page back into range.
    pub fn set_count(&mut self, count: u64) {
        self.count = count;
        let total = self.total_pages();
        if total >= 1 && self.current > total { self.current = total; }
    }

    pub fn window(&self) -> Vec<PageToken> { page_window(self.current, self.total_pages()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageToken::{Ellipsis, Page};

    #[test]
    fn test_small_totals_list_every_page() {
        assert_eq!(page_window(1, 5), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
        assert_eq!(page_window(4, 7).len(), 7);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_middle_page_is_centred() {
        assert_eq!(page_window(5, 10), vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]);
    }

    #[test]
    fn test_first_page_window() {
        assert_eq!(page_window(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(page_window(3, 10), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]);
    }

    #[test]
    fn test_last_page_window() {
        assert_eq!(page_window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(page_window(8, 10), vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]);
    }

    #[test]
    fn test_current_outside_range_snaps_to_ends() {
        assert_eq!(page_window(u32::MAX, 10), page_window(10, 10));
        assert_eq!(page_window(11, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(page_window(0, 10), page_window(1, 10));
    }

    #[test]
    fn test_window_never_exceeds_seven_tokens() {
        for total in 1..=40 {
            for current in 1..=total {
                assert!(page_window(current, total).len() <= 7, "current={current} total={total}");
            }
        }
    }

    #[test]
    fn test_tokens_serialize_as_numbers_and_dots() {
        let json = serde_json::to_string(&page_window(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut page = PageState::new(9);
        assert_eq!(page.total_pages(), 0);
        page.set_count(9);
        assert_eq!(page.total_pages(), 1);
        page.set_count(10);
        assert_eq!(page.total_pages(), 2);
    }

    #[test]
    fn test_go_to_out_of_range_is_a_no_op() {
        let mut page = PageState::new(9);
        page.set_count(45);
        assert_eq!(page.total_pages(), 5);
        assert!(!page.go_to(0));
        assert!(!page.go_to(6));
        assert_eq!(page.current(), 1);
        assert!(page.go_to(5));
        assert_eq!(page.current(), 5);
    }

    #[test]
    fn test_shrinking_count_clamps_current_page() {
        let mut page = PageState::new(10);
        page.set_count(100);
        page.go_to(8);
        page.set_count(25);
        assert_eq!(page.current(), 3);
        page.set_count(0);
        assert_eq!(page.current(), 3);
    }
}
