use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

const LABEL_COLUMNS: [&str; 2] = ["clip_label", "label"];
const DISPOSAL_COLUMNS: [&str; 2] = ["paderborn_disposal", "disposal_instructions"];

/// One row of the reference table, before embedding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceRow {
    /// Canonical waste category name.
    #[serde(rename = "clip_label", alias = "label")]
    pub label: String,
    /// How to dispose of it.
    #[serde(rename = "paderborn_disposal", alias = "disposal_instructions")]
    pub disposal_instructions: String,
    /// Optional remarks.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReferenceRow {
    /// Create a row.
    pub fn new(label: &str, disposal_instructions: &str, notes: Option<&str>) -> Self {
        ReferenceRow {
            label: label.to_owned(),
            disposal_instructions: disposal_instructions.to_owned(),
            notes: notes.map(|n| n.to_owned()),
        }
    }
}

/// Read reference rows from a CSV file.
pub fn read_rows(path: &Path) -> Result<Vec<ReferenceRow>, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound(path.to_path_buf())),
        Err(err) => return Err(LoadError::Unreadable(path.to_path_buf(), err)),
    };

    read_rows_from(file)
}

/// Read reference rows from CSV content.
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<ReferenceRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()
        .map_err(|e| LoadError::ParseError(format!("can't read header: {e}")))?
        .clone();

    if !headers.iter().any(|h| LABEL_COLUMNS.contains(&h)) {
        return Err(LoadError::ParseError("missing column clip_label".to_owned()));
    }
    if !headers.iter().any(|h| DISPOSAL_COLUMNS.contains(&h)) {
        return Err(LoadError::ParseError("missing column paderborn_disposal".to_owned()));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<ReferenceRow>().enumerate() {
        let row = result.map_err(|e| LoadError::ParseError(format!("row {}: {}", idx + 1, e)))?;
        rows.push(row);
    }

    Ok(rows)
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_read_rows_from() {
        let content = "clip_label,paderborn_disposal,notes
bottle,Put in yellow bin,
newspaper,\"Blue bin, flattened\",Remove plastic wrap
";
        let rows = read_rows_from(content.as_bytes()).expect("rows parsed");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "bottle");
        assert_eq!(rows[0].disposal_instructions, "Put in yellow bin");
        assert!(rows[0].notes.as_deref().map_or(true, |n| n.is_empty()));
        assert_eq!(rows[1].disposal_instructions, "Blue bin, flattened");
        assert_eq!(rows[1].notes, Some("Remove plastic wrap".into()));
    }

    #[test]
    fn test_read_rows_aliases_and_optional_notes() {
        let content = "label, disposal_instructions
banana,Brown organic bin
";
        let rows = read_rows_from(content.as_bytes()).expect("rows parsed");

        assert_eq!(rows, vec![ReferenceRow::new("banana", "Brown organic bin", None)]);
    }

    #[test]
    fn test_read_rows_errors() {
        let missing_disposal = "clip_label,notes\nbottle,\n";
        assert!(matches!(read_rows_from(missing_disposal.as_bytes()), Err(LoadError::ParseError(_))));

        let missing_label = "name,paderborn_disposal\nbottle,yellow bin\n";
        assert!(matches!(read_rows_from(missing_label.as_bytes()), Err(LoadError::ParseError(_))));

        let short_row = "clip_label,paderborn_disposal,notes\nbottle\n";
        assert!(matches!(read_rows_from(short_row.as_bytes()), Err(LoadError::ParseError(_))));

        let missing_file = Path::new("/definitely/not/here/guide.csv");
        assert!(matches!(read_rows(missing_file), Err(LoadError::NotFound(_))));
    }
}
