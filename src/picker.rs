//! Picker state: search input, filtered result window, and cursor movement.

use crate::catalog::NameRecord;
use crate::filter::{filter_view, FilterResult};
use crate::widgets::text_input::TextInput;

pub struct PickerState {
    pub search: TextInput,
    pub results: FilterResult,
    /// Cursor position within `results.indices`.
    pub cursor: usize,
    /// First visible row of the list window.
    pub offset: usize,
    /// Rows available at the last render, used for paging and scrolling.
    pub last_height: usize,
}

impl PickerState {
    pub fn new(search: TextInput) -> Self {
        Self {
            search,
            results: FilterResult::default(),
            cursor: 0,
            offset: 0,
            last_height: 0,
        }
    }

    /// Re-run the filter against the current view. The cursor resets to the
    /// top whenever the result set changes shape.
    pub fn refilter(&mut self, view: &[NameRecord]) {
        let results = filter_view(view, self.search.value());
        if results.indices != self.results.indices {
            self.cursor = 0;
            self.offset = 0;
        }
        self.results = results;
    }

    /// Index into the view of the row under the cursor.
    pub fn selected_view_index(&self) -> Option<usize> {
        self.results.indices.get(self.cursor).copied()
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
        self.scroll_to_cursor();
    }

    pub fn move_down(&mut self, n: usize) {
        if self.results.is_empty() {
            return;
        }
        self.cursor = (self.cursor + n).min(self.results.len() - 1);
        self.scroll_to_cursor();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
        self.scroll_to_cursor();
    }

    pub fn move_end(&mut self) {
        self.cursor = self.results.len().saturating_sub(1);
        self.scroll_to_cursor();
    }

    pub fn page_up(&mut self) {
        self.move_up(self.last_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.move_down(self.last_height.max(1));
    }

    /// Keep the cursor within the visible window. Called after movement and
    /// from the render path once the window height is known.
    pub fn scroll_to_cursor(&mut self) {
        if self.last_height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.last_height {
            self.offset = self.cursor + 1 - self.last_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_catalog_tsv, SetTag};

    fn picker_with_rows(n: usize) -> (PickerState, Vec<NameRecord>) {
        let tsv: String = (0..n).map(|i| format!("Name{}\t{}\n", i, 100)).collect();
        let view = parse_catalog_tsv(&tsv, SetTag::Simple).unwrap();
        let mut picker = PickerState::new(TextInput::new());
        picker.refilter(&view);
        (picker, view)
    }

    #[test]
    fn cursor_stays_within_results() {
        let (mut picker, _) = picker_with_rows(3);
        picker.move_down(10);
        assert_eq!(picker.cursor, 2);
        picker.move_up(10);
        assert_eq!(picker.cursor, 0);
    }

    #[test]
    fn refilter_resets_cursor_on_shape_change() {
        let (mut picker, view) = picker_with_rows(5);
        picker.move_down(3);
        picker.search.set_value("Name1".to_string());
        picker.refilter(&view);
        assert_eq!(picker.cursor, 0);
        assert_eq!(picker.results.len(), 1);
        assert_eq!(picker.selected_view_index(), Some(1));
    }

    #[test]
    fn window_follows_cursor() {
        let (mut picker, _) = picker_with_rows(20);
        picker.last_height = 5;
        picker.move_down(9);
        assert_eq!(picker.cursor, 9);
        assert_eq!(picker.offset, 5);
        picker.move_home();
        assert_eq!(picker.offset, 0);
        picker.move_end();
        assert_eq!(picker.offset, 15);
    }

    #[test]
    fn paging_moves_by_window_height() {
        let (mut picker, _) = picker_with_rows(20);
        picker.last_height = 6;
        picker.page_down();
        assert_eq!(picker.cursor, 6);
        picker.page_up();
        assert_eq!(picker.cursor, 0);
    }

    #[test]
    fn empty_results_keep_cursor_at_zero() {
        let (mut picker, view) = picker_with_rows(3);
        picker.search.set_value("zzz".to_string());
        picker.refilter(&view);
        assert!(picker.results.no_results());
        picker.move_down(1);
        assert_eq!(picker.cursor, 0);
        assert_eq!(picker.selected_view_index(), None);
    }
}
