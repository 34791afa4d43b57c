//! Chart export to PNG (plotters bitmap) and CSV (year column + one column per name).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::chart_data::{chart_bounds, year_categories, BoundSeries};
use crate::series::YEARS_LEN;

/// File stem used for exports, matching the public site's download name.
pub const EXPORT_STEM: &str = "jmena";

const X_TITLE: &str = "Rok narození";
const Y_TITLE: &str = "Počet lidí s daným jménem";

fn drawable(series: &[BoundSeries]) -> Vec<&BoundSeries> {
    series.iter().filter(|s| s.visible).collect()
}

/// Write the visible series to a PNG line chart using the plotters bitmap backend.
pub fn write_chart_png(path: &Path, series: &[BoundSeries]) -> Result<()> {
    use plotters::prelude::*;

    let visible = drawable(series);
    if visible.is_empty() {
        return Err(eyre!("No data to export"));
    }

    let (x_min, x_max, y_min, y_max) = chart_bounds(series);

    let root = BitMapBackend::new(path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(X_TITLE)
        .y_desc(Y_TITLE)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    let colors = [
        CYAN,
        MAGENTA,
        GREEN,
        YELLOW,
        BLUE,
        RED,
        RGBColor(128, 255, 255),
    ];

    for (idx, s) in visible.iter().enumerate() {
        let color = colors[idx % colors.len()];
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), color))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Write the visible series as CSV: first column the year, then one column per
/// name, rows covering the full fixed 1900–2023 range.
pub fn write_chart_csv(path: &Path, series: &[BoundSeries]) -> Result<()> {
    let visible = drawable(series);
    if visible.is_empty() {
        return Err(eyre!("No data to export"));
    }

    let mut f = File::create(path)?;

    write!(f, "{}", csv_field(X_TITLE))?;
    for s in &visible {
        write!(f, ",{}", csv_field(&s.name))?;
    }
    writeln!(f)?;

    let years = year_categories();
    for (row, year) in years.iter().enumerate().take(YEARS_LEN) {
        write!(f, "{}", year)?;
        for s in &visible {
            let y = s.points.get(row).map(|&(_, y)| y).unwrap_or(0.0);
            write!(f, ",{:.0}", y)?;
        }
        writeln!(f)?;
    }

    f.sync_all()?;
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
