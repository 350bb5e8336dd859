//! Environment export files.
//!
//! Writes captured environment variables as `KEY=value` lines that a shell can source directly.
//! Values containing newlines are double-quoted with each newline written as `\n`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Ordered `(key, value)` pairs to export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvExport {
    entries: Vec<(String, String)>,
}

impl EnvExport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for EnvExport {
    fn from(env: BTreeMap<String, String>) -> Self {
        Self {
            entries: env.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, String)> for EnvExport {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Format a single `KEY=value` line, without the trailing newline.
pub fn format_line(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{}=\"{}\"", key, value.replace('\n', "\\n"))
    } else {
        format!("{}={}", key, value)
    }
}

/// Write every entry as one newline-terminated line.
pub fn write_env<W: Write + ?Sized>(export: &EnvExport, out: &mut W) -> io::Result<()> {
    for (key, value) in &export.entries {
        writeln!(out, "{}", format_line(key, value))?;
    }
    Ok(())
}

/// Write the export to `file`, sync it, and close it. The file is closed on every path and the
/// first error is returned.
pub fn write_env_to_file_and_close(export: &EnvExport, file: File) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    write_env(export, &mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}
