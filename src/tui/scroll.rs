//! Focus and scroll state for terminal views
//!
//! The grid keeps a focused row that always stays on screen; rows may span
//! several terminal lines, so the offset is fitted against row heights. The
//! detail view only scrolls, without focus.

/// Focus and scroll position over a list of items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// First item on screen
    offset: usize,
    /// Number of items
    len: usize,
    /// Items per page, for page navigation
    page: usize,
    /// Focused item; `None` only when there are no items
    focus: Option<usize>,
}

impl ScrollState {
    /// Create a scroll state with focus on the first item
    pub fn new(len: usize, page: usize) -> Self {
        Self {
            offset: 0,
            len,
            page,
            focus: (len > 0).then_some(0),
        }
    }

    /// First item on screen
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of items
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no items
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Focused item
    #[inline]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Items per page
    #[inline]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Replace the item count and return focus to the top
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len, self.page);
    }

    /// Update items per page
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Focus an item, clamped to the last one
    pub fn set_focus(&mut self, item: usize) {
        if self.len == 0 {
            self.focus = None;
            return;
        }
        let item = item.min(self.len - 1);
        self.focus = Some(item);
        self.ensure_visible(item);
    }

    /// Move focus down one item
    pub fn focus_next(&mut self) {
        if let Some(f) = self.focus {
            self.set_focus(f.saturating_add(1));
        }
    }

    /// Move focus up one item
    pub fn focus_prev(&mut self) {
        if let Some(f) = self.focus {
            self.set_focus(f.saturating_sub(1));
        }
    }

    /// Move focus down one page
    pub fn page_down(&mut self) {
        if let Some(f) = self.focus {
            self.set_focus(f.saturating_add(self.page.max(1)));
        }
    }

    /// Move focus up one page
    pub fn page_up(&mut self) {
        if let Some(f) = self.focus {
            self.set_focus(f.saturating_sub(self.page.max(1)));
        }
    }

    /// Focus the first item
    pub fn home(&mut self) {
        self.set_focus(0);
    }

    /// Focus the last item
    pub fn end(&mut self) {
        self.set_focus(self.len.saturating_sub(1));
    }

    /// Scroll the view down one item without moving focus
    pub fn scroll_down(&mut self) {
        if self.offset < self.max_offset() {
            self.offset += 1;
        }
    }

    /// Scroll the view up one item without moving focus
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Scroll the view down one page without moving focus
    pub fn scroll_page_down(&mut self) {
        self.offset = self
            .offset
            .saturating_add(self.page.max(1))
            .min(self.max_offset());
    }

    /// Scroll the view up one page without moving focus
    pub fn scroll_page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.page.max(1));
    }

    /// Bring an item inside a page-sized window
    pub fn ensure_visible(&mut self, item: usize) {
        if item < self.offset {
            self.offset = item;
        } else if item >= self.offset + self.page.max(1) {
            self.offset = item + 1 - self.page.max(1);
        }
    }

    /// Fit the offset so the focused item is fully within `lines` terminal
    /// lines, given each item's height in lines.
    pub fn fit_to_lines<F>(&mut self, lines: usize, height_of: F)
    where
        F: Fn(usize) -> usize,
    {
        let Some(focus) = self.focus else {
            self.offset = 0;
            return;
        };
        if focus < self.offset {
            self.offset = focus;
            return;
        }
        let mut used: usize = (self.offset..=focus).map(&height_of).sum();
        while used > lines && self.offset < focus {
            used -= height_of(self.offset);
            self.offset += 1;
        }
    }

    /// Whether content extends past the page
    pub fn needs_scrollbar(&self) -> bool {
        self.len > self.page
    }

    fn max_offset(&self) -> usize {
        self.len.saturating_sub(self.page)
    }
}
