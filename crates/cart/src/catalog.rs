use std::{collections::HashSet, fs, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared::domain::{CatalogEntry, CatalogId, Price};

/// Read-only key lookup into the book catalog.
pub trait CatalogLookup: Send + Sync {
    fn lookup(&self, id: &CatalogId) -> Option<CatalogEntry>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl CategoryFilter {
    fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => entry
                .category
                .as_deref()
                .is_some_and(|category| slug(category) == slug(wanted)),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(raw.to_string()))
        }
    }
}

/// "Fantasy Fiction" and "fantasy-fiction" name the same category.
fn slug(raw: &str) -> String {
    raw.trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    books: Vec<CatalogEntry>,
}

/// Catalog held entirely in memory, in display order.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.clone()) {
                bail!("duplicate catalog id '{}'", entry.id);
            }
        }
        Ok(Self { entries })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(raw).context("failed to parse catalog toml")?;
        Self::new(file.books)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid catalog file '{}'", path.display()))
    }

    /// The store's shelf as shipped with the page.
    pub fn bookstore_default() -> Self {
        const DEFAULT_COVER: &str = "https://images-na.ssl-images-amazon.com/images/I/81QZ4X8QZJL.jpg";
        let book = |id: &str, title: &str, author: &str, cents: i64, cover: &str, category: &str| {
            CatalogEntry {
                id: CatalogId::from(id),
                title: title.to_string(),
                author: author.to_string(),
                unit_price: Price::from_cents(cents),
                cover_image: Some(cover.to_string()),
                category: Some(category.to_string()),
            }
        };

        Self {
            entries: vec![
                book(
                    "harry-potter",
                    "Harry Potter and the Philosopher's Stone",
                    "J.K. Rowling",
                    1299,
                    "https://images-na.ssl-images-amazon.com/images/I/81YOuOGFCJL.jpg",
                    "Fantasy Fiction",
                ),
                book(
                    "1984",
                    "1984",
                    "George Orwell",
                    999,
                    "https://images-na.ssl-images-amazon.com/images/I/71kxa1-0mfL.jpg",
                    "Dystopian Fiction",
                ),
                book("becoming", "Becoming", "Michelle Obama", 1499, DEFAULT_COVER, "Autobiography"),
                book(
                    "don-quixote",
                    "Don Quixote",
                    "Miguel de Cervantes",
                    1199,
                    DEFAULT_COVER,
                    "Classic Literature",
                ),
                book(
                    "long-walk",
                    "Long Walk to Freedom",
                    "Nelson Mandela",
                    1399,
                    DEFAULT_COVER,
                    "Autobiography",
                ),
                book("sapiens", "Sapiens", "Yuval Noah Harari", 1699, DEFAULT_COVER, "Non-Fiction"),
                book("born-crime", "Born a Crime", "Trevor Noah", 1299, DEFAULT_COVER, "Autobiography"),
                book("educated", "Educated", "Tara Westover", 1599, DEFAULT_COVER, "Autobiography"),
                book(
                    "glass-castle",
                    "The Glass Castle",
                    "Jeannette Walls",
                    1199,
                    DEFAULT_COVER,
                    "Autobiography",
                ),
            ],
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|entry| entry.category.as_deref())
            .filter(|category| seen.insert(slug(category)))
            .collect()
    }
}

impl CatalogLookup for StaticCatalog {
    fn lookup(&self, id: &CatalogId) -> Option<CatalogEntry> {
        self.entries.iter().find(|entry| &entry.id == id).cloned()
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
