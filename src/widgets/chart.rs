//! Chart pane: yearly line series for the selected names, or a placeholder.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::chart_data::{chart_bounds, format_count, BoundSeries};
use crate::config::Theme;

pub const EMPTY_PLACEHOLDER: &str = "Vyberte jména, která chcete porovnat";
pub const LOADING_PLACEHOLDER: &str = "Strpení…";
pub const X_TITLE: &str = "Rok narození";
pub const Y_TITLE: &str = "Počet lidí s daným jménem";
pub const ATTRIBUTION: &str = "Zdroj: Ministerstvo vnitra – Registr obyvatel";

const SERIES_COLOR_NAMES: [&str; 7] = [
    "chart_series_color_1",
    "chart_series_color_2",
    "chart_series_color_3",
    "chart_series_color_4",
    "chart_series_color_5",
    "chart_series_color_6",
    "chart_series_color_7",
];

pub struct ChartWidget<'a> {
    pub series: &'a [BoundSeries],
    pub theme: &'a Theme,
    /// True while the selection is empty (distinct from "still loading").
    pub selection_empty: bool,
    /// True while at least one selected name has an outstanding fetch.
    pub loading: bool,
    pub legend: bool,
}

impl ChartWidget<'_> {
    fn render_placeholder(&self, text: &str, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border")));
        let inner = block.inner(area);
        block.render(area, buf);

        let v_center = inner.height / 2;
        let centered = Rect {
            x: inner.x,
            y: inner.y + v_center,
            width: inner.width,
            height: u16::min(1, inner.height),
        };
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(self.theme.get("text_secondary")))
            .render(centered, buf);
    }
}

impl Widget for &ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.selection_empty {
            self.render_placeholder(EMPTY_PLACEHOLDER, area, buf);
            return;
        }
        let drawable: Vec<&BoundSeries> = self.series.iter().filter(|s| s.visible).collect();
        if drawable.is_empty() {
            // Nothing resolved yet, or every selected name is below the
            // visibility floor.
            let text = if self.loading {
                LOADING_PLACEHOLDER
            } else {
                EMPTY_PLACEHOLDER
            };
            self.render_placeholder(text, area, buf);
            return;
        }

        let (x_min, x_max, y_min, y_max) = chart_bounds(self.series);

        // Legend order matches selection order; colors follow the same order.
        let datasets: Vec<Dataset> = drawable
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let color = self.theme.get(SERIES_COLOR_NAMES[idx % SERIES_COLOR_NAMES.len()]);
                let mut dataset = Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(&s.points);
                if self.legend {
                    dataset = dataset.name(s.name.as_str());
                }
                dataset
            })
            .collect();

        let x_labels: Vec<Span> = [x_min, (x_min + x_max) / 2.0, x_max]
            .iter()
            .map(|v| Span::raw(format!("{:.0}", v)))
            .collect();
        let y_labels: Vec<Span> = [y_min, y_max / 2.0, y_max]
            .iter()
            .map(|v| Span::raw(format_count(*v as u64)))
            .collect();

        let title = Line::from(Span::styled(
            Y_TITLE,
            Style::default()
                .fg(self.theme.get("primary"))
                .add_modifier(Modifier::BOLD),
        ));

        let attribution = Line::from(Span::styled(
            ATTRIBUTION,
            Style::default().fg(self.theme.get("text_secondary")),
        ))
        .right_aligned();

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(title)
                    .title_bottom(attribution)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("panel_border"))),
            )
            .x_axis(
                Axis::default()
                    .title(X_TITLE)
                    .style(Style::default().fg(self.theme.get("text_secondary")))
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.get("text_secondary")))
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn theme() -> Theme {
        Theme::from_config(&ThemeConfig::default()).unwrap()
    }

    fn render_to_string(widget: &ChartWidget) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn series(name: &str, visible: bool) -> BoundSeries {
        BoundSeries {
            name: name.to_string(),
            points: vec![(1900.0, 0.0), (2023.0, 10.0)],
            visible,
        }
    }

    #[test]
    fn empty_selection_shows_prompt() {
        let theme = theme();
        let widget = ChartWidget {
            series: &[],
            theme: &theme,
            selection_empty: true,
            loading: false,
            legend: true,
        };
        assert!(render_to_string(&widget).contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn pending_fetches_show_loading() {
        let theme = theme();
        let widget = ChartWidget {
            series: &[],
            theme: &theme,
            selection_empty: false,
            loading: true,
            legend: true,
        };
        assert!(render_to_string(&widget).contains(LOADING_PLACEHOLDER));
    }

    #[test]
    fn resolved_series_render_axis_titles() {
        let theme = theme();
        let all = [series("Jan", true)];
        let widget = ChartWidget {
            series: &all,
            theme: &theme,
            selection_empty: false,
            loading: false,
            legend: true,
        };
        let out = render_to_string(&widget);
        assert!(out.contains(X_TITLE));
        assert!(out.contains("1900"));
        assert!(out.contains("2023"));
        assert!(out.contains("Zdroj: Ministerstvo vnitra"));
    }

    #[test]
    fn only_invisible_series_fall_back_to_prompt() {
        let theme = theme();
        let all = [series("Zoe", false)];
        let widget = ChartWidget {
            series: &all,
            theme: &theme,
            selection_empty: false,
            loading: false,
            legend: true,
        };
        assert!(render_to_string(&widget).contains(EMPTY_PLACEHOLDER));
    }
}
