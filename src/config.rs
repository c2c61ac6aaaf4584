use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::chart::{AxisScale, ScalePolicy};
use crate::data::schema::Layout;
use crate::error::Result;
use crate::export;
use crate::recipe::{PlotOptions, PlotRecipe};

/// Plot particle-shower depth profiles on a log-scale chart.
#[derive(Debug, Parser)]
#[command(name = "shower-plot", version, about)]
pub struct Cli {
    /// Table written by the shower simulation
    #[arg(default_value = "result.txt", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Column layout of the input table
    #[arg(short, long, value_enum, default_value_t = Layout::Species)]
    pub layout: Layout,

    /// JSON plot recipe describing a custom layout
    #[arg(short, long, conflicts_with = "layout", value_hint = ValueHint::FilePath)]
    pub recipe: Option<PathBuf>,

    /// Write a PNG or SVG image instead of opening a window
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value_t = export::DEFAULT_SIZE.0)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = export::DEFAULT_SIZE.1)]
    pub height: u32,

    /// Chart caption
    #[arg(long)]
    pub title: Option<String>,

    /// Use a linear y axis
    #[arg(long, action = ArgAction::SetTrue)]
    pub linear: bool,

    /// Hide the legend
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_legend: bool,
}

impl Cli {
    /// The recipe file if one was given, else the built-in layout.
    pub fn plot_recipe(&self) -> Result<PlotRecipe> {
        match &self.recipe {
            Some(path) => PlotRecipe::from_json_file(path),
            None => Ok(self.layout.recipe()),
        }
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            scale: ScalePolicy {
                x: AxisScale::Linear,
                y: if self.linear {
                    AxisScale::Linear
                } else {
                    AxisScale::Log
                },
            },
            legend: !self.no_legend,
            title: self.title.clone(),
        }
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
