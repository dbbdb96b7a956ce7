/// Fetch-window state for one gallery session
///
/// Windows are zero-based and inclusive. The initial window is
/// `[0, page_size - 1]`; it is clamped to the library size by [`window`]
/// once the first fetch learns how many assets exist.
///
/// [`window`]: PaginationCursor::window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    page_size: usize,
    window_start: usize,
    window_end: usize,
    reached_end: bool,
    is_fetching: bool,
}

impl PaginationCursor {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            window_start: 0,
            window_end: page_size - 1,
            reached_end: false,
            is_fetching: false,
        }
    }

    /// Set the page size for this session
    ///
    /// Only honored while no page has been served (or is being served);
    /// afterwards the size is fixed until [`reset`](Self::reset).
    /// Returns whether the new size was applied.
    pub fn initialize(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            log::warn!("Ignoring page size 0");
            return false;
        }
        if !self.is_at_start() {
            log::debug!(
                "Ignoring page size {} (session already past its first page)",
                page_size
            );
            return false;
        }
        *self = Self::new(page_size);
        true
    }

    /// Back to the first window, keeping the page size
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    /// Window to serve next for a library of `total_count` assets
    ///
    /// `None` means there is nothing left to serve.
    pub fn window(&self, total_count: usize) -> Option<(usize, usize)> {
        if self.reached_end || total_count == 0 || self.window_start >= total_count {
            return None;
        }
        Some((self.window_start, self.window_end.min(total_count - 1)))
    }

    /// Move past the window that was just served
    pub fn advance(&mut self, total_count: usize) {
        if total_count == 0 {
            self.reached_end = true;
            return;
        }
        let last = total_count - 1;
        if self.window_end >= last {
            self.reached_end = true;
        }
        self.window_start += self.page_size;
        self.window_end = if self.reached_end {
            last
        } else {
            (self.window_end + self.page_size).min(last)
        };
    }

    pub(crate) fn mark_ended(&mut self) {
        self.reached_end = true;
    }

    pub(crate) fn set_fetching(&mut self, fetching: bool) {
        self.is_fetching = fetching;
    }

    fn is_at_start(&self) -> bool {
        self.window_start == 0 && !self.reached_end && !self.is_fetching
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// Last index of the current window
    ///
    /// Before the first fetch this is `page_size - 1` regardless of the
    /// library size; use [`window`](Self::window) for the clamped bounds.
    pub fn window_end(&self) -> usize {
        self.window_end
    }

    pub fn reached_end(&self) -> bool {
        self.reached_end
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }
}
