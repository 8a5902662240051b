use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const BUNDLED_CATALOG: &str = include_str!("../../data/foods.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u32,
    pub name: String,
    /// kcal per serving
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

impl FoodItem {
    pub fn kcal(&self) -> f64 {
        f64::from(self.calories)
    }

    /// Tag match against the comma-joined tag list, so a request tag may hit
    /// part of a stored tag ("free" matches "gluten_free").
    fn matches_tag(&self, tag: &str) -> bool {
        self.dietary_tags.join(",").to_lowercase().contains(tag)
    }
}

/// Immutable food reference data, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    items: Vec<FoodItem>,
}

/// Outcome of preference filtering.
#[derive(Debug)]
pub struct CatalogSelection<'a> {
    pub items: Vec<&'a FoodItem>,
    /// `false` when nothing matched and the whole catalog was used instead.
    pub preferences_applied: bool,
}

impl FoodCatalog {
    pub fn new(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BUNDLED_CATALOG).context("parse bundled food catalog")
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let items: Vec<FoodItem> = serde_json::from_str(raw)?;
        Ok(Self::new(items))
    }

    /// Reads `path` when given, otherwise the catalog compiled into the binary.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let catalog = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("read food catalog {}", p.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("parse food catalog {}", p.display()))?
            }
            None => Self::bundled()?,
        };
        if catalog.is_empty() {
            warn!(source = ?path, "food catalog is empty; meal plans will have no foods");
        }
        info!(items = catalog.len(), source = ?path, "food catalog loaded");
        Ok(catalog)
    }

    #[cfg(test)]
    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items matching any of `tags` (OR). Falls back to the full catalog when
    /// nothing matches.
    pub fn select(&self, tags: &[String]) -> CatalogSelection<'_> {
        let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        let matched: Vec<&FoodItem> = self
            .items
            .iter()
            .filter(|item| wanted.iter().any(|t| item.matches_tag(t)))
            .collect();

        if matched.is_empty() {
            CatalogSelection {
                items: self.items.iter().collect(),
                preferences_applied: false,
            }
        } else {
            CatalogSelection {
                items: matched,
                preferences_applied: true,
            }
        }
    }
}
