//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::{catalog::LabSummary, models::LabProgress};

/// Newtype wrapper for displaying the lab catalog.
///
/// # Examples
///
/// ```rust
/// use labsim_core::{catalog::Catalog, display::LabSummaries};
///
/// let catalog = Catalog::builtin().unwrap();
/// let output = LabSummaries(catalog.summaries()).to_string();
/// assert!(output.contains("Linux Command Line Essentials"));
/// ```
pub struct LabSummaries(pub Vec<LabSummary>);

impl LabSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabSummary> {
        self.0.iter()
    }
}

impl IntoIterator for LabSummaries {
    type Item = LabSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for LabSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No labs found.")
        } else {
            for lab in &self.0 {
                write!(f, "{lab}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying stored progress records.
pub struct ProgressRecords(pub Vec<LabProgress>);

impl ProgressRecords {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabProgress> {
        self.0.iter()
    }
}

impl IntoIterator for ProgressRecords {
    type Item = LabProgress;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ProgressRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No progress recorded.")
        } else {
            for record in &self.0 {
                write!(f, "{record}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections() {
        assert_eq!(LabSummaries(Vec::new()).to_string(), "No labs found.\n");
        assert_eq!(
            ProgressRecords(Vec::new()).to_string(),
            "No progress recorded.\n"
        );
    }
}
