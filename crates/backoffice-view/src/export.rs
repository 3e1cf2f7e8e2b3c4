//! Flat row export of the filtered and sorted sequence.
//!
//! The exporter always sees every row matching the active filters, in the
//! active order. Paging never limits an export.

use serde::{Deserialize, Serialize};

use crate::accessor::FieldSource;
use crate::path::FieldPath;

/// One output column: a header and the field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    /// Column header as written to the file.
    pub header: String,
    /// Field projected into this column; may be nested.
    pub path: FieldPath,
}

impl ExportColumn {
    /// Creates a column.
    pub fn new(header: impl Into<String>, path: FieldPath) -> Self {
        ExportColumn {
            header: header.into(),
            path,
        }
    }
}

/// Ordered list of export columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportSpec {
    columns: Vec<ExportColumn>,
}

impl ExportSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        ExportSpec::default()
    }

    /// Appends a column.
    pub fn column(mut self, header: impl Into<String>, path: FieldPath) -> Self {
        self.columns.push(ExportColumn::new(header, path));
        self
    }

    /// Returns the columns in order.
    pub fn columns(&self) -> &[ExportColumn] {
        &self.columns
    }

    /// Returns the headers in column order.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// Projects one record into a flat row.
    ///
    /// Missing fields become empty cells.
    pub fn row<R: FieldSource + ?Sized>(&self, record: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| record.resolve(&c.path).to_text().into_owned())
            .collect()
    }
}

impl FromIterator<ExportColumn> for ExportSpec {
    fn from_iter<I: IntoIterator<Item = ExportColumn>>(iter: I) -> Self {
        ExportSpec {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Export-ready rows with their headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// One row per exported record, one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Projects every record of `sequence`, in order, through `spec`.
pub fn export<'r, R, I>(sequence: I, spec: &ExportSpec) -> ExportTable
where
    R: FieldSource + ?Sized + 'r,
    I: IntoIterator<Item = &'r R>,
{
    ExportTable {
        headers: spec.headers(),
        rows: sequence.into_iter().map(|record| spec.row(record)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    #[test]
    fn projects_nested_and_missing_fields() {
        let deposits = vec![
            json!({"amount": "50.00", "status": "approved", "user": {"email": "ann@x.io"}}),
            json!({"amount": 12, "status": "pending", "user": null}),
        ];
        let spec = ExportSpec::new()
            .column("Email", path("user.email"))
            .column("Amount", path("amount"))
            .column("Status", path("status"));

        let table = export(&deposits, &spec);
        assert_eq!(table.headers, ["Email", "Amount", "Status"]);
        assert_eq!(table.rows[0], ["ann@x.io", "50.00", "approved"]);
        assert_eq!(table.rows[1], ["", "12", "pending"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_sequence_keeps_headers() {
        let spec = ExportSpec::new().column("Id", path("id"));
        let table = export(std::iter::empty::<&serde_json::Value>(), &spec);
        assert_eq!(table.headers, ["Id"]);
        assert!(table.is_empty());
    }

    #[test]
    fn spec_deserializes_from_list() {
        let spec: ExportSpec =
            serde_json::from_str(r#"[{"header": "Email", "path": "user.email"}]"#).unwrap();
        assert_eq!(spec.columns()[0], ExportColumn::new("Email", path("user.email")));
    }
}
