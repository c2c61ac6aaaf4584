//! Load particle-shower depth profiles and plot them on a log-scale chart.
//!
//! ```text
//!  result.txt ──loader──▶ Table ──recipe──▶ ChartRequest ──render──▶ Chart
//!                                                                   ├─▶ export (png/svg)
//!                                                                   └─▶ viewer window
//! ```

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod recipe;
pub mod state;
pub mod ui;

pub use chart::{render, AxisScale, Chart, ChartRequest, ScalePolicy, Series};
pub use data::loader::{load, load_file, read_table};
pub use data::model::Table;
pub use data::schema::{ColumnSchema, Layout};
pub use error::{Error, Result};
pub use recipe::{PlotOptions, PlotRecipe};
