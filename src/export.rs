use std::path::Path;

use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::IntoLogRange;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::chart::{AxisScale, Chart};
use crate::error::{Error, Result};

pub const DEFAULT_SIZE: (u32, u32) = (1280, 760);

/// Write `chart` as an image. The extension picks the format (`png` or `svg`).
pub fn save(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let drawn = match ext.as_str() {
        "png" => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(root, chart)
        }
        "svg" => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(root, chart)
        }
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    drawn.map_err(|e| Error::Plot(format!("{e:#}")))?;

    log::info!("Wrote chart to {}", path.display());
    Ok(())
}

fn draw<DB>(root: DrawingArea<DB, Shift>, chart: &Chart) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50);
    if let Some(title) = chart.title() {
        builder.caption(title, FontDesc::new(FontFamily::SansSerif, 26.0, FontStyle::Normal));
    }

    let x = chart.x_range();
    let y = chart.y_range();
    let scale = chart.scale();

    // Each axis combination is a distinct coordinate type.
    match (scale.x, scale.y) {
        (AxisScale::Linear, AxisScale::Log) => {
            let mut ctx = builder.build_cartesian_2d(x, y.log_scale())?;
            draw_lines(&mut ctx, chart)?;
        }
        (AxisScale::Linear, AxisScale::Linear) => {
            let mut ctx = builder.build_cartesian_2d(x, y)?;
            draw_lines(&mut ctx, chart)?;
        }
        (AxisScale::Log, AxisScale::Log) => {
            let mut ctx = builder.build_cartesian_2d(x.log_scale(), y.log_scale())?;
            draw_lines(&mut ctx, chart)?;
        }
        (AxisScale::Log, AxisScale::Linear) => {
            let mut ctx = builder.build_cartesian_2d(x.log_scale(), y)?;
            draw_lines(&mut ctx, chart)?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_lines<'a, DB, X, Y>(
    ctx: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    chart: &Chart,
) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let scale = chart.scale();
    ctx.configure_mesh()
        .x_desc(chart.x_desc())
        .y_desc(chart.y_desc().unwrap_or(""))
        .x_label_formatter(&|v: &f64| tick_label(*v, scale.x))
        .y_label_formatter(&|v: &f64| tick_label(*v, scale.y))
        .label_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .draw()?;

    let legend = chart.legend_entries();
    for (i, line) in chart.lines().iter().enumerate() {
        let color = RGBColor(line.color.red, line.color.green, line.color.blue);
        let drawn = ctx.draw_series(LineSeries::new(
            line.points.iter().copied(),
            color.stroke_width(2),
        ))?;
        if let Some(&(label, swatch)) = legend.get(i) {
            let swatch = RGBColor(swatch.red, swatch.green, swatch.blue);
            drawn.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 30, y)], swatch.stroke_width(2))
            });
        }
    }

    if !legend.is_empty() {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .label_font(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    Ok(())
}

fn tick_label(value: f64, axis: AxisScale) -> String {
    match axis {
        AxisScale::Log => format!("{value:.0e}"),
        AxisScale::Linear => {
            let text = format!("{value:.3}");
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{render, ChartRequest, Series};

    fn sample_chart() -> Chart {
        let depth: Vec<f64> = (0..50).map(|i| i as f64 * 10.0).collect();
        let muons: Vec<f64> = depth.iter().map(|d| 1.0 + d * d).collect();
        let photons: Vec<f64> = depth.iter().map(|d| 10.0 + d).collect();
        render(
            ChartRequest::new(vec![
                Series::new("muons", depth.clone(), muons),
                Series::new("photons", depth, photons),
            ])
            .with_title("profile"),
        )
        .unwrap()
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = save(&sample_chart(), Path::new("chart.bmp"), DEFAULT_SIZE).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "bmp"));
    }

    #[test]
    fn log_ticks_use_exponents() {
        assert_eq!(tick_label(1000.0, AxisScale::Log), "1e3");
        assert_eq!(tick_label(12.5, AxisScale::Linear), "12.5");
        assert_eq!(tick_label(300.0, AxisScale::Linear), "300");
    }

    // Needs system fonts: cargo test -- --ignored
    #[test]
    #[ignore]
    fn writes_png_and_svg() {
        let dir = std::env::temp_dir();
        for name in ["shower_plot_test.png", "shower_plot_test.svg"] {
            let path = dir.join(name);
            save(&sample_chart(), &path, (640, 480)).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
