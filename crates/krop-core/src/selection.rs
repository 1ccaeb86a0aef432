//! Per-page crop selections.
//!
//! [`SelectionModel`] is the only thing the job builder needs: a rectangle
//! for a page number, or nothing. [`PageSelections`] is an in-memory model
//! with the three selection modes a host UI typically offers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Lookup of the crop rectangle for a 1-based page number.
pub trait SelectionModel {
    fn rect_for(&self, page: u32) -> Option<Rect>;
}

/// A single rectangle used for every page.
impl SelectionModel for Rect {
    fn rect_for(&self, _page: u32) -> Option<Rect> {
        Some(*self)
    }
}

impl<F> SelectionModel for F
where
    F: Fn(u32) -> Option<Rect>,
{
    fn rect_for(&self, page: u32) -> Option<Rect> {
        self(page)
    }
}

/// How selections are shared between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// One selection for the whole document.
    #[default]
    All,
    /// One selection for odd pages and one for even pages.
    EvenOdd,
    /// Every page has its own selection.
    Individual,
}

impl SelectionMode {
    /// Slot that holds the selection for `page` in this mode.
    fn slot(self, page: u32) -> u32 {
        match self {
            SelectionMode::All => 0,
            SelectionMode::EvenOdd => page % 2,
            SelectionMode::Individual => page,
        }
    }
}

/// Selections keyed by the current [`SelectionMode`].
///
/// Each mode keeps its own slots, so switching modes back and forth does not
/// lose what was drawn in the other mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSelections {
    mode: SelectionMode,
    slots: BTreeMap<(SelectionMode, u32), Rect>,
}

impl PageSelections {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            slots: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    fn key(&self, page: u32) -> (SelectionMode, u32) {
        (self.mode, self.mode.slot(page))
    }

    /// Store `rect` as the selection seen on `page` under the current mode.
    pub fn set(&mut self, page: u32, rect: Rect) {
        let key = self.key(page);
        self.slots.insert(key, rect);
    }

    /// Remove the selection seen on `page`, returning it.
    pub fn remove(&mut self, page: u32) -> Option<Rect> {
        let key = self.key(page);
        self.slots.remove(&key)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl SelectionModel for PageSelections {
    fn rect_for(&self, page: u32) -> Option<Rect> {
        self.slots.get(&self.key(page)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(n: f64) -> Rect {
        Rect::new(n, n, n + 100.0, n + 100.0)
    }

    #[test]
    fn test_rect_is_uniform_selection() {
        let r = rect(0.0);
        assert_eq!(r.rect_for(1), Some(r));
        assert_eq!(r.rect_for(999), Some(r));
    }

    #[test]
    fn test_closure_selection() {
        let lookup = |page: u32| (page <= 2).then(|| rect(page as f64));
        assert_eq!(lookup.rect_for(2), Some(rect(2.0)));
        assert_eq!(lookup.rect_for(3), None);
    }

    #[test]
    fn test_all_mode_shares_one_rect() {
        let mut selections = PageSelections::new(SelectionMode::All);
        selections.set(3, rect(5.0));

        assert_eq!(selections.rect_for(1), Some(rect(5.0)));
        assert_eq!(selections.rect_for(42), Some(rect(5.0)));
    }

    #[test]
    fn test_even_odd_mode() {
        let mut selections = PageSelections::new(SelectionMode::EvenOdd);
        selections.set(1, rect(1.0));
        selections.set(4, rect(2.0));

        assert_eq!(selections.rect_for(3), Some(rect(1.0)));
        assert_eq!(selections.rect_for(6), Some(rect(2.0)));
    }

    #[test]
    fn test_individual_mode() {
        let mut selections = PageSelections::new(SelectionMode::Individual);
        selections.set(2, rect(7.0));

        assert_eq!(selections.rect_for(2), Some(rect(7.0)));
        assert_eq!(selections.rect_for(1), None);
    }

    #[test]
    fn test_modes_keep_separate_slots() {
        let mut selections = PageSelections::new(SelectionMode::All);
        selections.set(1, rect(1.0));

        selections.set_mode(SelectionMode::Individual);
        assert_eq!(selections.rect_for(1), None);
        selections.set(1, rect(9.0));

        selections.set_mode(SelectionMode::All);
        assert_eq!(selections.rect_for(1), Some(rect(1.0)));
    }

    #[test]
    fn test_remove() {
        let mut selections = PageSelections::new(SelectionMode::EvenOdd);
        selections.set(2, rect(2.0));

        assert_eq!(selections.remove(4), Some(rect(2.0)));
        assert_eq!(selections.rect_for(2), None);
    }
}
