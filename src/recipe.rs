use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{render, Chart, ChartRequest, ScalePolicy, Series};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::schema::{ColumnSchema, Layout};
use crate::error::{Error, Result};

/// Divides eV by this to plot GeV.
pub const EV_PER_GEV: f64 = 1e9;

const SPECIES_SERIES: &[&str] = &["nuclei", "pions", "muons", "electrons", "photons", "neutrinos"];
const COLLAPSED_SERIES: &[&str] = &["pions", "muons", "electrons", "photons", "neutrinos"];

// ---------------------------------------------------------------------------
// SeriesSpec – one line of the chart, by column name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    pub column: String,
    /// Legend label; the column name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisor: Option<f64>,
}

impl SeriesSpec {
    pub fn column(column: &str) -> Self {
        Self {
            column: column.to_string(),
            label: None,
            divisor: None,
        }
    }

    pub fn gev(column: &str, unit: &str) -> Self {
        Self {
            column: column.to_string(),
            label: Some(format!("{column} ({unit})")),
            divisor: Some(EV_PER_GEV),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }
}

// ---------------------------------------------------------------------------
// PlotRecipe – schema plus which columns become lines
// ---------------------------------------------------------------------------

/// The columns a file provides and how to plot them.
///
/// JSON form:
///
/// ```json
/// {
///   "columns": ["depth", "particles", "muons", "energy"],
///   "x": "depth",
///   "series": [
///     { "column": "muons" },
///     { "column": "energy", "label": "energy (GeV)", "divisor": 1e9 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotRecipe {
    columns: ColumnSchema,
    #[serde(default = "default_x")]
    x: String,
    series: Vec<SeriesSpec>,
}

fn default_x() -> String {
    "depth".to_string()
}

impl PlotRecipe {
    pub fn new(columns: ColumnSchema, x: impl Into<String>, series: Vec<SeriesSpec>) -> Result<Self> {
        let recipe = Self {
            columns,
            x: x.into(),
            series,
        };
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let recipe: Self = serde_json::from_str(text)?;
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        let referenced = std::iter::once(&self.x).chain(self.series.iter().map(|s| &s.column));
        for name in referenced {
            if !self.columns.contains(name) {
                return Err(Error::UnknownColumn(name.clone()));
            }
        }
        Ok(())
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.columns
    }

    pub fn x_column(&self) -> &str {
        &self.x
    }

    pub fn series(&self) -> &[SeriesSpec] {
        &self.series
    }

    /// Build the default log-y request from a loaded table.
    pub fn build_request(&self, table: &Table) -> Result<ChartRequest> {
        let x = lookup(table, &self.x)?;

        let series = self
            .series
            .iter()
            .map(|spec| {
                let y = lookup(table, &spec.column)?;
                let series = Series::new(spec.label(), x.to_vec(), y.to_vec());
                Ok(match spec.divisor {
                    Some(divisor) => series.divided_by(divisor),
                    None => series,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ChartRequest::new(series).with_x_desc(self.x.clone()))
    }
}

// ---------------------------------------------------------------------------
// PlotOptions – request settings that outlive one file
// ---------------------------------------------------------------------------

/// Chart settings chosen on the command line, reused when the viewer opens
/// another file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub scale: ScalePolicy,
    pub legend: bool,
    pub title: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            scale: ScalePolicy::default(),
            legend: true,
            title: None,
        }
    }
}

/// One loaded file and the chart drawn from it.
#[derive(Debug, Clone)]
pub struct Plotted {
    pub table: Table,
    pub chart: Chart,
}

impl PlotRecipe {
    /// Load `path` against this recipe's schema and render it.
    pub fn plot_file(&self, path: &Path, options: &PlotOptions) -> Result<Plotted> {
        let table = load_file(path, self.schema())?;
        let chart = self.plot_table(&table, options)?;
        Ok(Plotted { table, chart })
    }

    pub fn plot_table(&self, table: &Table, options: &PlotOptions) -> Result<Chart> {
        let mut request = self
            .build_request(table)?
            .with_scale(options.scale)
            .with_legend(options.legend);
        if let Some(title) = &options.title {
            request = request.with_title(title.clone());
        }
        render(request)
    }
}

fn lookup<'t>(table: &'t Table, name: &str) -> Result<&'t [f64]> {
    table
        .column(name)
        .ok_or_else(|| Error::UnknownColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Built-in recipes
// ---------------------------------------------------------------------------

impl Layout {
    pub fn recipe(self) -> PlotRecipe {
        let mut series: Vec<SeriesSpec> = match self {
            Layout::Species | Layout::EnergyDeposit => {
                SPECIES_SERIES.iter().map(|c| SeriesSpec::column(c)).collect()
            }
            Layout::Collapsed => COLLAPSED_SERIES.iter().map(|c| SeriesSpec::column(c)).collect(),
        };
        match self {
            Layout::Species => {}
            Layout::EnergyDeposit => {
                series.push(SeriesSpec::gev("remainin_energy", "GeV"));
                series.push(SeriesSpec::gev("ionization", "GeV/m"));
            }
            Layout::Collapsed => series.push(SeriesSpec::gev("energy", "GeV")),
        }

        PlotRecipe {
            columns: self.schema(),
            x: default_x(),
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::chart::AxisScale;
    use crate::data::loader::read_table;

    #[test]
    fn builtin_recipes_validate() {
        for layout in Layout::ALL {
            let recipe = layout.recipe();
            recipe.validate().unwrap();
            assert_eq!(recipe.schema(), &layout.schema());
        }
    }

    #[test]
    fn energy_labels_carry_units() {
        let labels: Vec<String> = Layout::EnergyDeposit
            .recipe()
            .series()
            .iter()
            .map(|s| s.label().to_string())
            .collect();
        assert_eq!(
            labels,
            [
                "nuclei",
                "pions",
                "muons",
                "electrons",
                "photons",
                "neutrinos",
                "remainin_energy (GeV)",
                "ionization (GeV/m)",
            ]
        );

        let last = Layout::Collapsed.recipe().series().last().cloned().unwrap();
        assert_eq!(last.label(), "energy (GeV)");
        assert_eq!(last.divisor, Some(EV_PER_GEV));
    }

    #[test]
    fn remaining_energy_is_plotted_in_gev() {
        let recipe = Layout::EnergyDeposit.recipe();
        let table = read_table("1 100 50 10 5 3 2 1 5e9 2e9\n".as_bytes(), recipe.schema()).unwrap();

        let chart = render(recipe.build_request(&table).unwrap()).unwrap();
        let line = chart
            .lines()
            .iter()
            .find(|l| l.label == "remainin_energy (GeV)")
            .unwrap();
        assert_approx_eq!(f64, line.points[0].1, 5.0);
    }

    #[test]
    fn selected_species_become_lines() {
        let schema = Layout::Species.schema();
        let recipe = PlotRecipe::new(
            schema.clone(),
            "depth",
            vec![SeriesSpec::column("nuclei"), SeriesSpec::column("pions")],
        )
        .unwrap();
        let table = read_table("1.0 100 50 10 5 3 2 1\n".as_bytes(), &schema).unwrap();

        let chart = render(recipe.build_request(&table).unwrap()).unwrap();
        let labels: Vec<&str> = chart.legend_entries().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["nuclei", "pions"]);
        assert_eq!(chart.lines()[0].points, vec![(1.0, 50.0)]);
        assert_eq!(chart.lines()[1].points, vec![(1.0, 10.0)]);
    }

    #[test]
    fn options_shape_the_chart() {
        let recipe = Layout::Species.recipe();
        let table = read_table("0 1 1 0 0 0 0 0\n".as_bytes(), recipe.schema()).unwrap();
        let options = PlotOptions {
            scale: ScalePolicy {
                x: AxisScale::Linear,
                y: AxisScale::Linear,
            },
            legend: false,
            title: Some("proton shower".to_string()),
        };

        let chart = recipe.plot_table(&table, &options).unwrap();
        assert_eq!(chart.title(), Some("proton shower"));
        assert!(!chart.legend());
        assert_eq!(chart.lines().len(), 6);

        // Zero counts only fit on a linear axis.
        assert!(matches!(
            recipe.plot_table(&table, &PlotOptions::default()).unwrap_err(),
            Error::NonPositiveValue { .. }
        ));
    }

    #[test]
    fn json_recipe_round_trips_defaults() {
        let recipe = PlotRecipe::from_json_str(
            r#"{
                "columns": ["depth", "particles", "muons", "energy"],
                "series": [
                    { "column": "muons" },
                    { "column": "energy", "label": "energy (GeV)", "divisor": 1e9 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(recipe.x_column(), "depth");
        assert_eq!(recipe.series()[0].label(), "muons");
        assert_eq!(recipe.series()[1].divisor, Some(1e9));
    }

    #[test]
    fn json_recipe_with_unknown_series_column() {
        let err = PlotRecipe::from_json_str(
            r#"{ "columns": ["depth", "muons"], "series": [{ "column": "pions" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(name) if name == "pions"));
    }

    #[test]
    fn json_recipe_with_duplicate_columns() {
        let err = PlotRecipe::from_json_str(
            r#"{ "columns": ["depth", "depth"], "series": [] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Recipe(_)));
    }
}
