// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::{Category, CategoryColor};

/// Palette entry used for categories whose color is not recognized.
pub const DEFAULT_PALETTE_ENTRY: &str = "#9ca3af"; // Muted grey

/// Maps a category color to its palette entry.
pub fn palette_entry(color: CategoryColor) -> &'static str {
    match color {
        CategoryColor::Indigo => "#3f51b5",
        CategoryColor::Vermilion => "#e34234",
        CategoryColor::Moss => "#8a9a5b",
        CategoryColor::Gray => "#a3a3a3",
        CategoryColor::Default => DEFAULT_PALETTE_ENTRY,
    }
}

/// The fixed set of categories a task can be tagged with.
///
/// Built once at startup and never modified; handlers share it through the
/// application state.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            categories: vec![
                builtin("cat1", "Personal", CategoryColor::Indigo),
                builtin("cat2", "Work", CategoryColor::Vermilion),
                builtin("cat3", "Health", CategoryColor::Moss),
            ],
        }
    }
}

fn builtin(id: &str, name: &str, color: CategoryColor) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        color,
        description: None,
    }
}

impl CategoryRegistry {
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}
