use eframe::egui::{Color32, Ui};
use egui_plot::{log_grid_spacer, Corner, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints};

use crate::chart::AxisScale;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the chart in the central panel.
///
/// egui_plot only has linear axes, so a log axis is drawn in log10 space and
/// its ticks and hover labels are mapped back to real values.
pub fn chart_plot(ui: &mut Ui, state: &ViewerState) {
    let chart = &state.chart;
    let scale = chart.scale();
    let log_x = scale.x == AxisScale::Log;
    let log_y = scale.y == AxisScale::Log;

    let mut plot = Plot::new("shower_plot")
        .x_axis_label(chart.x_desc())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value: &PlotPoint| {
            let x = from_axis(value.x, log_x);
            let y = from_axis(value.y, log_y);
            if name.is_empty() {
                format!("x = {x:.4}\ny = {y:.4e}")
            } else {
                format!("{name}\nx = {x:.4}\ny = {y:.4e}")
            }
        });

    if chart.legend() {
        plot = plot.legend(Legend::default().position(Corner::RightTop));
    }
    if let Some(desc) = chart.y_desc() {
        plot = plot.y_axis_label(desc);
    }
    if log_x {
        plot = plot
            .x_grid_spacer(log_grid_spacer(10))
            .x_axis_formatter(|mark, _range| decade_label(mark));
    }
    if log_y {
        plot = plot
            .y_grid_spacer(log_grid_spacer(10))
            .y_axis_formatter(|mark, _range| decade_label(mark));
    }

    let legend = chart.legend_entries();
    plot.show(ui, |plot_ui| {
        for (i, line) in chart.lines().iter().enumerate() {
            let points: PlotPoints = line
                .points
                .iter()
                .map(|&(x, y)| [to_axis(x, log_x), to_axis(y, log_y)])
                .collect();

            let color = Color32::from_rgb(line.color.red, line.color.green, line.color.blue);
            let mut plotted = Line::new(points).color(color).width(1.5);
            if let Some(&(label, _)) = legend.get(i) {
                plotted = plotted.name(label);
            }
            plot_ui.line(plotted);
        }
    });
}

fn to_axis(value: f64, log: bool) -> f64 {
    if log {
        value.log10()
    } else {
        value
    }
}

fn from_axis(value: f64, log: bool) -> f64 {
    if log {
        10f64.powf(value)
    } else {
        value
    }
}

/// `1e3` on whole decades, blank in between.
fn decade_label(mark: GridMark) -> String {
    let exponent = mark.value.round();
    if (mark.value - exponent).abs() < 1e-6 {
        format!("1e{}", exponent as i64)
    } else {
        String::new()
    }
}
