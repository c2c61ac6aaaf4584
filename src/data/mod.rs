/// Data layer: column schemas, loading, and the loaded table.
///
/// Architecture:
/// ```text
///  result.txt / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows against a ColumnSchema → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named f64 columns, one value per row
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod schema;
