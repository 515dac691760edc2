use std::fmt;

/// The paging cursor: which of `total` question cards is visible.
///
/// Invariant: `current_index < total` whenever `total > 0`. Moves by exactly
/// one step and never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    current_index: usize,
    total: usize,
}

impl PagerState {
    /// Start on the first card.
    pub fn new(total: usize) -> Self {
        Self {
            current_index: 0,
            total,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Check if there is nothing to page through.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    /// Check if the cursor is on the terminal card (where "submit" replaces "next").
    pub fn is_last(&self) -> bool {
        self.total > 0 && self.current_index == self.total - 1
    }

    /// Advance one card. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.current_index + 1 < self.total {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one card. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.current_index > 0 && self.total > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: if self.total == 0 {
                0
            } else {
                self.current_index + 1
            },
            total: self.total,
        }
    }

    /// The navigation affordances for the current card.
    pub fn controls(&self, submission_pending: bool) -> NavControls {
        NavControls {
            previous_enabled: !self.is_first(),
            show_next: !self.is_last() && !self.is_empty(),
            show_submit: self.is_last(),
            submit_enabled: self.is_last() && !submission_pending,
        }
    }

    /// Everything a page needs to render the current card.
    ///
    /// Returns `None` when there are no cards.
    pub fn view(&self, submission_pending: bool) -> Option<PagerView> {
        (!self.is_empty()).then(|| PagerView {
            index: self.current_index,
            progress: self.progress(),
            controls: self.controls(submission_pending),
        })
    }
}

/// The "N of M" progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the visible card.
    pub position: usize,
    pub total: usize,
}

impl Progress {
    /// Progress as a whole percentage, rounded down.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.position.min(self.total) * 100 / self.total) as u8
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.position as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.position, self.total)
    }
}

/// Which navigation buttons the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub previous_enabled: bool,
    pub show_next: bool,
    pub show_submit: bool,
    /// False while a submission is in flight.
    pub submit_enabled: bool,
}

/// A render instruction: show card `index` and only that card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerView {
    pub index: usize,
    pub progress: Progress,
    pub controls: NavControls,
}
