use super::schema::ColumnSchema;

// ---------------------------------------------------------------------------
// Table – the complete loaded file
// ---------------------------------------------------------------------------

/// Named numeric columns of one loaded file.
///
/// Columns keep schema order and all have the same length (the row count).
/// Only the loader builds tables, so the shape always matches the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: ColumnSchema,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Start an empty table with one column per schema name.
    pub(crate) fn with_schema(schema: ColumnSchema) -> Self {
        let columns = vec![Vec::new(); schema.len()];
        Table { schema, columns }
    }

    /// Append one row. The caller has already checked the field count.
    pub(crate) fn push_row(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.columns.len());
        for (column, &value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn column_names(&self) -> &[String] {
        self.schema.names()
    }

    /// Values of the named column, in file row order.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.schema
            .position(name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate `(name, values)` pairs in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.schema
            .names()
            .iter()
            .zip(&self.columns)
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_land_in_named_columns() {
        let schema = ColumnSchema::new(["depth", "muons"]).unwrap();
        let mut table = Table::with_schema(schema);
        assert!(table.is_empty());

        table.push_row(&[1.0, 10.0]);
        table.push_row(&[2.0, 20.0]);

        assert_eq!(table.width(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("depth"), Some(&[1.0, 2.0][..]));
        assert_eq!(table.column("muons"), Some(&[10.0, 20.0][..]));
        assert_eq!(table.column("pions"), None);

        let names: Vec<&str> = table.columns().map(|(name, _)| name).collect();
        assert_eq!(names, ["depth", "muons"]);
    }
}
