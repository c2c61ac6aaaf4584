//! Chart layer: turn labelled series into a validated, sink-independent chart.
//!
//! ```text
//!   ChartRequest ──render──▶ Chart ──▶ export (png/svg)
//!                                  └─▶ viewer window
//! ```

use std::ops::Range;

use crate::color::{generate_palette, Rgb};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// Scale of each axis. Defaults to linear x with logarithmic y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePolicy {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self {
            x: AxisScale::Linear,
            y: AxisScale::Log,
        }
    }
}

/// One labelled line before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Every y value is divided by this before drawing (e.g. 1e9 for eV → GeV).
    pub divisor: Option<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            divisor: None,
        }
    }

    pub fn divided_by(mut self, divisor: f64) -> Self {
        self.divisor = Some(divisor);
        self
    }
}

/// Everything needed to draw one chart. Consumed by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub series: Vec<Series>,
    pub scale: ScalePolicy,
    pub legend: bool,
    pub title: Option<String>,
    pub x_desc: String,
    pub y_desc: Option<String>,
}

impl ChartRequest {
    /// A log-y request with the legend on and depth on the x axis.
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
            scale: ScalePolicy::default(),
            legend: true,
            title: None,
            x_desc: "depth".to_string(),
            y_desc: None,
        }
    }

    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_x_desc(mut self, desc: impl Into<String>) -> Self {
        self.x_desc = desc.into();
        self
    }

    pub fn with_y_desc(mut self, desc: impl Into<String>) -> Self {
        self.y_desc = Some(desc.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Rendered chart
// ---------------------------------------------------------------------------

/// A drawable line: scaled points in x order.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

impl Line {
    /// Smallest and largest y, or `None` for an empty line.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|&(_, y)| y))
    }
}

/// The rendered chart handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    lines: Vec<Line>,
    scale: ScalePolicy,
    legend: bool,
    title: Option<String>,
    x_desc: String,
    y_desc: Option<String>,
    x_range: Range<f64>,
    y_range: Range<f64>,
}

impl Chart {
    /// Lines in the order their series were supplied.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// `(label, colour)` pairs in supplied order; empty when the legend is off.
    pub fn legend_entries(&self) -> Vec<(&str, Rgb)> {
        if !self.legend {
            return Vec::new();
        }
        self.lines
            .iter()
            .map(|line| (line.label.as_str(), line.color))
            .collect()
    }

    pub fn scale(&self) -> ScalePolicy {
        self.scale
    }

    pub fn legend(&self) -> bool {
        self.legend
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn x_desc(&self) -> &str {
        &self.x_desc
    }

    pub fn y_desc(&self) -> Option<&str> {
        self.y_desc.as_deref()
    }

    pub fn x_range(&self) -> Range<f64> {
        self.x_range.clone()
    }

    pub fn y_range(&self) -> Range<f64> {
        self.y_range.clone()
    }
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Validate and scale every series of `request`.
///
/// Fails on the first bad series; nothing is drawn from a partially valid
/// request. On a log axis every value must be strictly positive after
/// scaling.
pub fn render(request: ChartRequest) -> Result<Chart> {
    let ChartRequest {
        series,
        scale,
        legend,
        title,
        x_desc,
        y_desc,
    } = request;

    if series.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let palette = generate_palette(series.len());
    let lines = series
        .into_iter()
        .zip(palette)
        .map(|(series, color)| build_line(series, color, scale))
        .collect::<Result<Vec<_>>>()?;

    let x_range = axis_range(
        bounds(lines.iter().flat_map(|l| l.points.iter().map(|&(x, _)| x))),
        scale.x,
    );
    let y_range = axis_range(
        bounds(lines.iter().flat_map(|l| l.points.iter().map(|&(_, y)| y))),
        scale.y,
    );

    log::info!("Rendered chart with {} series", lines.len());

    Ok(Chart {
        lines,
        scale,
        legend,
        title,
        x_desc,
        y_desc,
        x_range,
        y_range,
    })
}

fn build_line(series: Series, color: Rgb, scale: ScalePolicy) -> Result<Line> {
    let Series {
        label,
        x,
        y,
        divisor,
    } = series;

    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            label,
            x: x.len(),
            y: y.len(),
        });
    }

    let divisor = match divisor {
        Some(d) if d == 0.0 || !d.is_finite() => {
            return Err(Error::InvalidDivisor { label, divisor: d })
        }
        Some(d) => d,
        None => 1.0,
    };

    let mut points = Vec::with_capacity(x.len());
    for (index, (&xi, &yi)) in x.iter().zip(&y).enumerate() {
        let yi = yi / divisor;
        check_value(&label, index, xi, scale.x)?;
        check_value(&label, index, yi, scale.y)?;
        points.push((xi, yi));
    }
    // Stable: equal depths keep file order.
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(Line {
        label,
        color,
        points,
    })
}

fn check_value(label: &str, index: usize, value: f64, axis: AxisScale) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::NonFiniteValue {
            label: label.to_string(),
            index,
        });
    }
    if axis == AxisScale::Log && value <= 0.0 {
        return Err(Error::NonPositiveValue {
            label: label.to_string(),
            index,
            value,
        });
    }
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn axis_range(bounds: Option<(f64, f64)>, axis: AxisScale) -> Range<f64> {
    match (bounds, axis) {
        (None, AxisScale::Log) => 1.0..10.0,
        (None, AxisScale::Linear) => 0.0..1.0,
        (Some((lo, hi)), AxisScale::Log) => {
            if lo == hi {
                lo / 10.0..hi * 10.0
            } else {
                lo / 1.25..hi * 1.25
            }
        }
        (Some((lo, hi)), AxisScale::Linear) => {
            let span = hi - lo;
            if span == 0.0 {
                lo - 1.0..hi + 1.0
            } else {
                lo - span * 0.02..hi + span * 0.02
            }
        }
    }
}
