//! Local data directory for CSV snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Filesystem location for local artifacts. Created on first write.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure(&self) -> Result<&Path> {
        fs::create_dir_all(&self.root)?;
        Ok(&self.root)
    }

    /// Write rows as a CSV file named `file_name` and return its path.
    ///
    /// Path separators in `file_name` are replaced so season labels such as
    /// `2023/24` stay inside the directory.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn write_csv<I>(&self, file_name: &str, columns: &[&str], rows: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.ensure()?;
        let path = self.root.join(sanitize_file_name(file_name));
        let content = render_csv(columns, rows);
        fs::write(&path, content)?;
        info!(path = %path.display(), "Wrote CSV snapshot");
        Ok(path)
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.replace(['/', '\\'], "-")
}

/// Render a header line and rows, quoting fields that need it.
#[must_use]
pub fn render_csv<I>(columns: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut csv = columns
        .iter()
        .map(|c| escape_field(c))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');

    for row in rows {
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render an optional value as a CSV field; `None` becomes an empty field.
#[must_use]
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_rows() {
        let csv = render_csv(
            &["id", "name"],
            vec![vec!["1".into(), "Leinster".into()], vec!["2".into(), "Munster".into()]],
        );
        assert_eq!(csv, "id,name\n1,Leinster\n2,Munster\n");
    }

    #[test]
    fn quotes_fields_with_separators() {
        let csv = render_csv(&["name"], vec![vec!["Stade \"Marcel\", Michelin".into()]]);
        assert_eq!(csv, "name\n\"Stade \"\"Marcel\"\", Michelin\"\n");
    }

    #[test]
    fn optional_fields_render_empty() {
        assert_eq!(opt::<i32>(None), "");
        assert_eq!(opt(Some(42)), "42");
    }

    #[test]
    fn writes_into_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::new(tmp.path().join("nested/data"));
        let path = dir
            .write_csv("matches_urc_2023/24.csv", &["a"], vec![vec!["1".into()]])
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "matches_urc_2023-24.csv");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\n1\n");
    }
}
