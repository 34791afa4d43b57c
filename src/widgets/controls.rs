//! Bottom controls bar: key hints, set-toggle state, and selection count.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::catalog::{NameCatalog, SetTag};
use crate::config::Theme;

pub struct ControlsBar<'a> {
    pub catalog: &'a NameCatalog,
    pub theme: &'a Theme,
    pub selection_count: usize,
    pub searching: bool,
    /// Event/fetch counters, shown only in debug mode.
    pub debug_status: Option<String>,
}

impl ControlsBar<'_> {
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.searching {
            vec![
                ("Enter", "vybrat"),
                ("↑/↓", "pohyb"),
                ("Esc", "zpět"),
            ]
        } else {
            vec![
                ("/", "hledat"),
                ("Enter", "vybrat"),
                ("1/2", "sady"),
                ("c", "zrušit"),
                ("e", "PNG"),
                ("d", "CSV"),
                ("?", "nápověda"),
                ("q", "konec"),
            ]
        }
    }
}

impl Widget for &ControlsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = self.theme.get("controls_bg");
        let key_style = Style::default()
            .fg(self.theme.get("secondary"))
            .bg(bg)
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(self.theme.get("text_primary")).bg(bg);
        let dim_style = Style::default().fg(self.theme.get("text_secondary")).bg(bg);

        let mut spans: Vec<Span> = Vec::new();
        for (key, label) in self.hints() {
            spans.push(Span::styled(format!(" {} ", key), key_style));
            spans.push(Span::styled(format!("{}  ", label), label_style));
        }

        let sets = SetTag::ALL
            .iter()
            .map(|&set| {
                let mark = if self.catalog.show(set) { "●" } else { "○" };
                format!("{} {}", mark, set.data_dir())
            })
            .collect::<Vec<_>>()
            .join("  ");
        spans.push(Span::styled(format!("  {}", sets), dim_style));
        if self.selection_count > 0 {
            spans.push(Span::styled(
                format!("  vybráno: {}", self.selection_count),
                dim_style,
            ));
        }
        if let Some(debug) = &self.debug_status {
            spans.push(Span::styled(format!("  [{}]", debug), dim_style));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(bg))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;

    fn render_to_string(bar: &ControlsBar) -> String {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn normal_mode_lists_global_hints() {
        let catalog = NameCatalog::new();
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        let bar = ControlsBar {
            catalog: &catalog,
            theme: &theme,
            selection_count: 2,
            searching: false,
            debug_status: None,
        };
        let out = render_to_string(&bar);
        assert!(out.contains("hledat"));
        assert!(out.contains("vybráno: 2"));
    }

    #[test]
    fn search_mode_swaps_hints() {
        let catalog = NameCatalog::new();
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        let bar = ControlsBar {
            catalog: &catalog,
            theme: &theme,
            selection_count: 0,
            searching: true,
            debug_status: None,
        };
        let out = render_to_string(&bar);
        assert!(out.contains("zpět"));
        assert!(!out.contains("nápověda"));
    }
}
