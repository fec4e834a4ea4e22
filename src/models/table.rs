//! Source table types.

use super::units::is_missing_marker;

/// Position of the reference identifier in a row.
pub const REFERENCE_FIELD: usize = 0;

/// Position of the nested units blob in a row.
pub const UNITS_FIELD: usize = 12;

/// One record of the source table, fields addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Creates a row from raw text fields.
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Returns the field at `index`, or `None` on a short row.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Returns all fields in order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true for a row without fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reference identifier (field 0), empty when absent.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.field(REFERENCE_FIELD).unwrap_or_default()
    }

    /// Units blob (field 12).
    ///
    /// `None` when the row is too short or the field holds a missing-value
    /// marker.
    #[must_use]
    pub fn units_raw(&self) -> Option<&str> {
        self.field(UNITS_FIELD).filter(|raw| !is_missing_marker(raw))
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered, fully materialized sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    rows: Vec<Row>,
}

impl SourceTable {
    /// Creates a table from rows.
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Appends a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterates rows in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl FromIterator<Row> for SourceTable {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SourceTable {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_row(reference: &str, units: &str) -> Row {
        let mut fields = vec![reference.to_string()];
        fields.extend((1..UNITS_FIELD).map(|i| format!("f{i}")));
        fields.push(units.to_string());
        Row::new(fields)
    }

    #[test]
    fn test_reference_and_units() {
        let row = wide_row("REF 01", "A;B|C;D");
        assert_eq!(row.reference(), "REF 01");
        assert_eq!(row.units_raw(), Some("A;B|C;D"));
        assert_eq!(row.len(), 13);
    }

    #[test]
    fn test_short_row_has_no_units() {
        let row: Row = ["REF", "x", "y"].into_iter().collect();
        assert_eq!(row.units_raw(), None);
        assert_eq!(row.field(12), None);
    }

    #[test]
    fn test_missing_markers_have_no_units() {
        assert_eq!(wide_row("R", "").units_raw(), None);
        assert_eq!(wide_row("R", "NaN").units_raw(), None);
        assert_eq!(wide_row("R", "NULL").units_raw(), None);
    }

    #[test]
    fn test_empty_row_reference_is_empty() {
        let row = Row::default();
        assert!(row.is_empty());
        assert_eq!(row.reference(), "");
    }

    #[test]
    fn test_table_preserves_order() {
        let table: SourceTable = vec![wide_row("a", "1"), wide_row("b", "2")]
            .into_iter()
            .collect();
        let refs: Vec<_> = table.iter().map(Row::reference).collect();
        assert_eq!(refs, vec!["a", "b"]);
        assert_eq!(table.len(), 2);
    }
}
