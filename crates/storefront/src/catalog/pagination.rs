//! Client-side windowing of fully fetched lists.

/// Blog posts shown per listing page.
pub const BLOG_PAGE_SIZE: usize = 5;

/// Width of the numeric page-button window.
pub const PAGE_WINDOW_WIDTH: u32 = 4;

/// One page of a fully fetched list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    /// Items visible on this page.
    pub items: &'a [T],
    /// 1-based page number, exactly as requested.
    pub page: u32,
    /// `ceil(count / page_size)`.
    pub total_pages: u32,
}

impl<T> PageSlice<'_, T> {
    /// Whether the "previous" control is enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether the "next" control is enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `count` items.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(count.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Window `items` into the 1-based `page` of size `page_size`.
///
/// The visible range is `[(page-1)*page_size, min(page*page_size, len))`.
/// A page outside `1..=total_pages` is not clamped; it simply shows nothing.
#[must_use]
pub fn paginate<T>(items: &[T], page: u32, page_size: usize) -> PageSlice<'_, T> {
    let total_pages = total_pages(items.len(), page_size);

    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    let visible: &[T] = if page == 0 {
        &[]
    } else {
        items.get(start..end).unwrap_or(&[])
    };

    PageSlice {
        items: visible,
        page,
        total_pages,
    }
}

/// Page numbers for the numeric page controls.
///
/// Shows every page when there are at most [`PAGE_WINDOW_WIDTH`] of them.
/// Otherwise keeps a window of that width around `current`, shifted to stay
/// within `1..=total_pages` near either edge.
#[must_use]
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= PAGE_WINDOW_WIDTH {
        return (1..=total_pages).collect();
    }

    let start = if current <= 2 {
        1
    } else if current >= total_pages - 1 {
        total_pages - PAGE_WINDOW_WIDTH + 1
    } else {
        current - 1
    };

    (start..start + PAGE_WINDOW_WIDTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(23, 5), 5);
    }

    #[test]
    fn test_slices_for_every_page() {
        for n in 0..=23 {
            let list = items(n);
            let total = total_pages(n, BLOG_PAGE_SIZE);
            for page in 1..=total {
                let slice = paginate(&list, page, BLOG_PAGE_SIZE);
                let start = 5 * (page as usize - 1);
                let end = (5 * page as usize).min(n);
                assert_eq!(slice.items, &list[start..end], "n={n} page={page}");
                assert_eq!(slice.total_pages, total);
            }
        }
    }

    #[test]
    fn test_boundary_controls() {
        let list = items(12);

        let first = paginate(&list, 1, BLOG_PAGE_SIZE);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let middle = paginate(&list, 2, BLOG_PAGE_SIZE);
        assert!(middle.has_previous());
        assert!(middle.has_next());

        let last = paginate(&list, 3, BLOG_PAGE_SIZE);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.items, &[10, 11]);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let list = items(7);
        assert!(paginate(&list, 4, BLOG_PAGE_SIZE).items.is_empty());
        assert!(paginate(&list, 0, BLOG_PAGE_SIZE).items.is_empty());
        assert_eq!(paginate(&list, 4, BLOG_PAGE_SIZE).page, 4);
    }

    #[test]
    fn test_window_shows_all_small_totals() {
        assert_eq!(page_window(1, 0), Vec::<u32>::new());
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(3, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_window_starts_at_one_near_start() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_window_ends_at_total_near_end() {
        assert_eq!(page_window(9, 10), vec![7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![7, 8, 9, 10]);
        assert_eq!(page_window(4, 5), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_window_follows_current_in_middle() {
        assert_eq!(page_window(3, 10), vec![2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![5, 6, 7, 8]);
        assert_eq!(page_window(8, 10), vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_window_always_within_bounds() {
        for total in 5..=12 {
            for current in 1..=total {
                let window = page_window(current, total);
                assert_eq!(window.len(), 4);
                assert!(window.iter().all(|p| (1..=total).contains(p)));
                assert!(window.contains(&current));
            }
        }
    }
}
