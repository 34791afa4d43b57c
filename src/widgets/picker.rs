//! Picker pane: selected-name badges, search box, and the windowed candidate list.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::catalog::{NameCatalog, NameRecord, SetTag};
use crate::chart_data::format_count;
use crate::config::Theme;
use crate::picker::PickerState;
use crate::selection::SelectionStore;

pub const SEARCH_PLACEHOLDER: &str = "Hledat…";
pub const LOADING_PLACEHOLDER: &str = "Strpení…";
pub const NO_RESULTS: &str = "No results found.";
pub const CLEAR_LABEL: &str = "Zrušit výběr";

/// Badge row content: visible names plus an optional "+ N další" overflow label.
pub fn badge_labels(
    selection: &SelectionStore,
    catalog: &NameCatalog,
    max_badges: usize,
) -> (Vec<String>, Option<String>) {
    let entries = selection.entries();
    let visible = entries
        .iter()
        .take(max_badges)
        .map(|&key| {
            catalog
                .lookup(key)
                .map(|r| r.display_name.clone())
                .unwrap_or_else(|| format!("#{}", key.id))
        })
        .collect();
    let overflow = entries.len().saturating_sub(max_badges);
    let overflow = (overflow > 0).then(|| format!("+ {} další", overflow));
    (visible, overflow)
}

pub struct PickerWidget<'a> {
    pub state: &'a mut PickerState,
    pub view: &'a [NameRecord],
    pub catalog: &'a NameCatalog,
    pub selection: &'a SelectionStore,
    pub theme: &'a Theme,
    pub max_badges: usize,
    pub focused: bool,
}

impl PickerWidget<'_> {
    fn render_badges(&self, area: Rect, buf: &mut Buffer) {
        let (labels, overflow) = badge_labels(self.selection, self.catalog, self.max_badges);
        let badge_style = Style::default()
            .fg(self.theme.get("badge"))
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(self.theme.get("dimmed"));

        let mut spans: Vec<Span> = Vec::new();
        for label in &labels {
            spans.push(Span::styled(format!(" {} ", label), badge_style));
            spans.push(Span::raw(" "));
        }
        if let Some(overflow) = overflow {
            spans.push(Span::styled(format!(" {} ", overflow), dim));
            spans.push(Span::raw(" "));
        }
        if !self.selection.is_empty() {
            spans.push(Span::styled(format!("[c] {}", CLEAR_LABEL), dim));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_search(&self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            self.theme.get("panel_border_active")
        } else {
            self.theme.get("panel_border")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.state.search.is_empty() && !self.state.search.is_focused() {
            Paragraph::new(SEARCH_PLACEHOLDER)
                .style(Style::default().fg(self.theme.get("text_secondary")))
                .render(inner, buf);
        } else {
            (&self.state.search).render(inner, buf);
        }
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        self.state.last_height = area.height as usize;
        self.state.scroll_to_cursor();

        if !self.catalog.ready() {
            for set in SetTag::ALL {
                if let Some(e) = self.catalog.failure(set) {
                    Paragraph::new(format!("Seznam jmen se nepodařilo načíst: {}", e))
                        .style(Style::default().fg(self.theme.get("error")))
                        .render(area, buf);
                    return;
                }
            }
            Paragraph::new(LOADING_PLACEHOLDER)
                .style(Style::default().fg(self.theme.get("text_secondary")))
                .render(area, buf);
            return;
        }
        if self.state.results.no_results() {
            Paragraph::new(NO_RESULTS)
                .style(Style::default().fg(self.theme.get("text_secondary")))
                .render(area, buf);
            return;
        }

        // "reversed" parses to Reset, which keeps the modifier fallback.
        let selected_style = match self.theme.get("list_selected") {
            Color::Reset => Style::default().add_modifier(Modifier::REVERSED),
            color => Style::default().bg(color),
        };
        let text_style = Style::default().fg(self.theme.get("text_primary"));
        let count_style = Style::default().fg(self.theme.get("text_secondary"));
        let mark_style = Style::default().fg(self.theme.get("success"));

        let window = self
            .state
            .results
            .indices
            .iter()
            .enumerate()
            .skip(self.state.offset)
            .take(area.height as usize);

        let mut lines = Vec::with_capacity(area.height as usize);
        for (row, &view_idx) in window {
            let record = &self.view[view_idx];
            let checked = self.selection.contains(record.key());
            let mark = if checked { "[x] " } else { "[ ] " };
            let count = format_count(record.frequency);
            let width = area.width as usize;
            let name_width = width
                .saturating_sub(mark.len())
                .saturating_sub(count.len() + 2);
            let name = truncated(&record.display_name, name_width);
            let pad = name_width.saturating_sub(name.chars().count());

            let mut spans = vec![
                Span::styled(mark, mark_style),
                Span::styled(name, text_style),
                Span::raw(" ".repeat(pad + 2)),
                Span::styled(count, count_style),
            ];
            if row == self.state.cursor {
                spans = spans
                    .into_iter()
                    .map(|s| {
                        let style = s.style.patch(selected_style);
                        Span::styled(s.content, style)
                    })
                    .collect();
            }
            lines.push(Line::from(spans));
        }
        Paragraph::new(lines).render(area, buf);
    }
}

fn truncated(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

impl Widget for &mut PickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [badges, search, list] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(area);

        self.render_badges(badges, buf);
        self.render_search(search, buf);
        self.render_list(list, buf);
    }
}
