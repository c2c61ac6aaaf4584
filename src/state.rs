use std::path::{Path, PathBuf};

use crate::chart::Chart;
use crate::export;
use crate::recipe::{PlotOptions, PlotRecipe, Plotted};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Chart currently on screen.
    pub chart: Chart,

    /// Recipe used for every file opened in this window.
    pub recipe: PlotRecipe,

    pub options: PlotOptions,

    /// File the chart was drawn from.
    pub source: PathBuf,

    /// Data rows in `source`.
    pub rows: usize,

    /// Pixel size used by "Save image…".
    pub image_size: (u32, u32),

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(plotted: Plotted, recipe: PlotRecipe, options: PlotOptions, source: PathBuf) -> Self {
        Self {
            rows: plotted.table.row_count(),
            chart: plotted.chart,
            recipe,
            options,
            source,
            image_size: export::DEFAULT_SIZE,
            status_message: None,
        }
    }

    /// Load and plot another file with the same recipe. On failure the
    /// current chart stays and the error goes to the status line.
    pub fn open(&mut self, path: PathBuf) {
        match self.recipe.plot_file(&path, &self.options) {
            Ok(plotted) => {
                self.rows = plotted.table.row_count();
                self.chart = plotted.chart;
                self.source = path;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to open {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Write the current chart as PNG or SVG.
    pub fn save(&mut self, path: &Path) {
        match export::save(&self.chart, path, self.image_size) {
            Ok(()) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
