//! Binding reports for interactive help and full listings
//!
//! Reports are plain data. The host decides how to present them; `Display`
//! renders an aligned text table and `Serialize` gives JSON.

use std::fmt;

use serde::Serialize;

use super::context::Mode;
use super::types::{display_sequence, KeyToken};

/// One `(sequence, description)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRow {
    pub keys: Vec<KeyToken>,
    pub description: String,
}

/// A reserved key and what it does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialKeyRow {
    pub role: String,
    pub key: KeyToken,
}

/// All bindings of one mode below some prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub mode: Mode,
    pub title: String,
    pub rows: Vec<BindingRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingReport {
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub special_keys: Vec<SpecialKeyRow>,
    pub sections: Vec<ReportSection>,
}

impl BindingReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Section for `mode`, if present
    pub fn section(&self, mode: Mode) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.mode == mode)
    }

    /// Total number of binding rows across all sections
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

fn write_table(
    f: &mut fmt::Formatter<'_>,
    header: (&str, &str),
    rows: &[(String, &str)],
) -> fmt::Result {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .chain(std::iter::once(header.0.len()))
        .max()
        .unwrap_or(0);

    writeln!(f, "  {:<width$}  {}", header.0, header.1, width = width)?;
    for (left, right) in rows {
        writeln!(f, "  {:<width$}  {}", left, right, width = width)?;
    }
    Ok(())
}

impl fmt::Display for BindingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;

        if !self.special_keys.is_empty() {
            writeln!(f)?;
            writeln!(f, "Special Keys")?;
            let rows: Vec<(String, &str)> = self
                .special_keys
                .iter()
                .map(|row| (row.role.clone(), row.key.as_str()))
                .collect();
            write_table(f, ("Role", "Key"), &rows)?;
        }

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            if section.rows.is_empty() {
                writeln!(f, "  (none)")?;
                continue;
            }
            let rows: Vec<(String, &str)> = section
                .rows
                .iter()
                .map(|row| (display_sequence(&row.keys), row.description.as_str()))
                .collect();
            write_table(f, ("Key", "Binding"), &rows)?;
        }
        Ok(())
    }
}
