//! MMID package catalog parsed from the project's `downloads.md` link table.
//!
//! The table has one row per language:
//! `| language | 100 images | 1 image | metadata | dictionary | web text |`
//! where each cell after the first holds a markdown link.

use crate::{Error, ImageLimit, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Downloadable artefact kinds offered per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// 100 images per word.
    Full,
    /// 1 image per word.
    Mini,
    Metadata,
    Dictionary,
    Text,
}

impl PackageKind {
    pub const ALL: [PackageKind; 5] = [
        PackageKind::Full,
        PackageKind::Mini,
        PackageKind::Metadata,
        PackageKind::Dictionary,
        PackageKind::Text,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Full => "full",
            PackageKind::Mini => "mini",
            PackageKind::Metadata => "metadata",
            PackageKind::Dictionary => "dictionary",
            PackageKind::Text => "text",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        PackageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(label))
    }

    /// Image package to download for a requested per-word limit.
    ///
    /// The mini package only carries one image per word, so anything above
    /// one needs the full package.
    #[must_use]
    pub fn for_limit(limit: ImageLimit) -> Self {
        match limit {
            ImageLimit::Limited(1) => PackageKind::Mini,
            _ => PackageKind::Full,
        }
    }

    fn column(self) -> usize {
        match self {
            PackageKind::Full => 2,
            PackageKind::Mini => 3,
            PackageKind::Metadata => 4,
            PackageKind::Dictionary => 5,
            PackageKind::Text => 6,
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PackageKind::from_label(s).ok_or_else(|| format!("unknown package type '{s}'"))
    }
}

/// Download links for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageLinks {
    links: BTreeMap<&'static str, String>,
}

impl PackageLinks {
    #[must_use]
    pub fn get(&self, kind: PackageKind) -> Option<&str> {
        self.links.get(kind.as_str()).map(String::as_str)
    }

    pub fn set(&mut self, kind: PackageKind, url: String) {
        self.links.insert(kind.as_str(), url);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// All languages listed in a catalog, keyed by lowercase language name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    languages: BTreeMap<String, PackageLinks>,
}

impl Catalog {
    /// Load and parse a `downloads.md` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::parse(&text);
        log::info!(
            "Loaded {} languages from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse the markdown table rows of a `downloads.md` document.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut languages = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if !line.starts_with('|') || line.contains("---") {
                continue;
            }

            let cells: Vec<&str> = line.split('|').map(str::trim).collect();
            if cells.len() < 3 {
                continue;
            }

            let language = cells[1].to_lowercase();
            if language.is_empty() || language == "language" || language.contains("**") {
                continue;
            }

            let mut links = PackageLinks::default();
            for kind in PackageKind::ALL {
                if let Some(url) = cells.get(kind.column()).and_then(|cell| extract_link(cell)) {
                    links.set(kind, url);
                }
            }

            if !links.is_empty() {
                languages.insert(language, links);
            }
        }

        Self { languages }
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&PackageLinks> {
        self.languages.get(&language.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Language names in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Languages grouped under their uppercase first letter.
    #[must_use]
    pub fn grouped_by_initial(&self) -> Vec<(char, Vec<&str>)> {
        let mut groups: Vec<(char, Vec<&str>)> = Vec::new();
        for language in self.languages() {
            let initial = language
                .chars()
                .next()
                .map_or('?', |c| c.to_ascii_uppercase());
            if let Some((current, members)) = groups.last_mut()
                && *current == initial
            {
                members.push(language);
                continue;
            }
            groups.push((initial, vec![language]));
        }
        groups
    }
}

/// First `(http://...)` or `(https://...)` target inside a table cell.
///
/// A bare scheme such as `(https://)` is not a link.
fn extract_link(cell: &str) -> Option<String> {
    cell.match_indices('(').find_map(|(idx, _)| {
        let rest = &cell[idx + 1..];
        let after_scheme = rest
            .strip_prefix("http://")
            .or_else(|| rest.strip_prefix("https://"))?;
        let end = rest.find(')')?;
        if after_scheme.starts_with(')') {
            return None;
        }
        Some(rest[..end].to_string())
    })
}
