use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// ColumnSchema – ordered column names of one file layout
// ---------------------------------------------------------------------------

/// The ordered column names a table file provides.
///
/// Always non-empty, with unique and non-blank names. The i-th field of every
/// row is assigned to the i-th name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSchema {
    names: Vec<String>,
}

impl ColumnSchema {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(Error::InvalidSchema("no columns".to_string()));
        }

        let mut seen = BTreeSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(Error::InvalidSchema("blank column name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidSchema(format!("duplicate column '{name}'")));
            }
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns (and so the expected field count per row).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

impl TryFrom<Vec<String>> for ColumnSchema {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<ColumnSchema> for Vec<String> {
    fn from(schema: ColumnSchema) -> Self {
        schema.names
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Layout – the known result.txt variants
// ---------------------------------------------------------------------------

/// The column layouts the shower simulation is known to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Layout {
    /// Species split out, no energy columns (8 columns).
    #[default]
    Species,
    /// Species plus remaining energy and ionization deposit (10 columns).
    EnergyDeposit,
    /// No nuclei column, one collapsed energy column (8 columns).
    Collapsed,
}

const SPECIES: &[&str] = &[
    "depth",
    "particles",
    "nuclei",
    "pions",
    "electrons",
    "photons",
    "muons",
    "neutrinos",
];

const ENERGY_DEPOSIT: &[&str] = &[
    "depth",
    "particles",
    "nuclei",
    "pions",
    "electrons",
    "photons",
    "muons",
    "neutrinos",
    "remainin_energy",
    "ionization",
];

const COLLAPSED: &[&str] = &[
    "depth",
    "particles",
    "pions",
    "electrons",
    "photons",
    "muons",
    "neutrinos",
    "energy",
];

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Species, Layout::EnergyDeposit, Layout::Collapsed];

    pub fn column_names(self) -> &'static [&'static str] {
        match self {
            Layout::Species => SPECIES,
            Layout::EnergyDeposit => ENERGY_DEPOSIT,
            Layout::Collapsed => COLLAPSED,
        }
    }

    pub fn schema(self) -> ColumnSchema {
        // The built-in name lists are non-empty and unique.
        ColumnSchema {
            names: self.column_names().iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Species => "species",
            Layout::EnergyDeposit => "energy-deposit",
            Layout::Collapsed => "collapsed",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
