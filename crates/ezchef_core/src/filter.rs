//! crates/ezchef_core/src/filter.rs
//!
//! The client-side filter and sort pipeline for lists that have already been
//! fetched. Everything here is pure: inputs are borrowed and a new list is
//! returned, so callers can re-run the pipeline whenever the source list or a
//! filter field changes.

use crate::domain::{Category, Cookbook, Difficulty, Recipe};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Sort Keys
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    HighestRated,
    DifficultyAsc,
    DifficultyDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::HighestRated,
        SortKey::DifficultyAsc,
        SortKey::DifficultyDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::HighestRated => "highest_rated",
            SortKey::DifficultyAsc => "difficulty_asc",
            SortKey::DifficultyDesc => "difficulty_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

//=========================================================================================
// Recipe Filter
//=========================================================================================

/// The filter and sort configuration of a recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub search: String,
    pub category: Option<String>,
    pub region: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub sort: SortKey,
}

impl RecipeFilter {
    /// True when the recipe passes every filter that is set.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !contains_folded(&recipe.name, &needle)
                && !contains_folded(&recipe.description, &needle)
            {
                return false;
            }
        }

        if let Some(kind) = non_empty(&self.category) {
            if recipe.category.as_ref().map(|c| c.kind.as_str()) != Some(kind) {
                return false;
            }
        }

        if let Some(region) = non_empty(&self.region) {
            if recipe.category.as_ref().map(|c| c.region.as_str()) != Some(region) {
                return false;
            }
        }

        match self.difficulty {
            Some(level) => recipe.difficulty == level,
            None => true,
        }
    }

    /// Whether anything differs from the default view (drives "clear filters").
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || non_empty(&self.category).is_some()
            || non_empty(&self.region).is_some()
            || self.difficulty.is_some()
            || self.sort != SortKey::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(folded_needle)
}

//=========================================================================================
// Pipelines
//=========================================================================================

/// Filters and sorts a copy of `recipes`. The source slice is never touched.
pub fn filter_recipes(recipes: &[Recipe], filter: &RecipeFilter) -> Vec<Recipe> {
    let mut visible: Vec<Recipe> = recipes
        .iter()
        .filter(|recipe| filter.matches(recipe))
        .cloned()
        .collect();
    sort_recipes(&mut visible, filter.sort);
    visible
}

/// Stable in-place sort. Recipes without a date sort as the oldest.
pub fn sort_recipes(recipes: &mut [Recipe], key: SortKey) {
    match key {
        SortKey::Newest => recipes.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortKey::Oldest => recipes.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
        SortKey::HighestRated => {
            recipes.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()))
        }
        SortKey::DifficultyAsc => recipes.sort_by(|a, b| a.difficulty.cmp(&b.difficulty)),
        SortKey::DifficultyDesc => recipes.sort_by(|a, b| b.difficulty.cmp(&a.difficulty)),
    }
}

/// Categories whose type or region contains `search`, case-insensitively.
pub fn filter_categories(categories: &[Category], search: &str) -> Vec<Category> {
    let needle = search.to_lowercase();
    categories
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.kind.to_lowercase().contains(&needle)
                || c.region.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Cookbooks whose title or description contains `search`, case-insensitively.
pub fn filter_cookbooks(cookbooks: &[Cookbook], search: &str) -> Vec<Cookbook> {
    let needle = search.to_lowercase();
    cookbooks
        .iter()
        .filter(|c| {
            needle.is_empty()
                || contains_folded(&c.title, &needle)
                || contains_folded(&c.description, &needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_timestamp, CategoryRef, Review};

    fn recipe(id: i64, name: &str, date: &str, difficulty: u8) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            description: String::new(),
            difficulty: Difficulty::new(difficulty).unwrap(),
            date_added: parse_timestamp(date),
            category: None,
            ingredients: Vec::new(),
            instructions: String::new(),
            reviews: Vec::new(),
        }
    }

    fn review(rating: u8) -> Review {
        Review {
            id: None,
            recipe_id: None,
            rating,
            comment: String::new(),
            date: None,
            author: String::new(),
        }
    }

    fn ids(recipes: &[Recipe]) -> Vec<i64> {
        recipes.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_list_stays_empty_for_every_configuration() {
        for sort in SortKey::ALL {
            let filter = RecipeFilter {
                search: "soup".into(),
                category: Some("Dinner".into()),
                region: Some("Thai".into()),
                difficulty: Difficulty::new(2),
                sort,
            };
            assert!(filter_recipes(&[], &filter).is_empty());
        }
        assert!(filter_categories(&[], "x").is_empty());
        assert!(filter_cookbooks(&[], "x").is_empty());
    }

    #[test]
    fn empty_search_imposes_no_constraint() {
        let mut odd = recipe(1, "", "2024-01-01", 1);
        odd.description = "ANYTHING at all".into();
        let source = vec![odd, recipe(2, "Stew", "2023-01-01", 4)];

        let filter = RecipeFilter::default();
        assert!(source.iter().all(|r| filter.matches(r)));
        assert_eq!(filter_recipes(&source, &filter).len(), source.len());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut curry = recipe(1, "Green Curry", "2024-01-01", 3);
        curry.description = "Coconut base".into();
        let source = vec![curry, recipe(2, "Pancakes", "2024-01-02", 1)];

        let by_name = RecipeFilter {
            search: "CURRY".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &by_name)), vec![1]);

        let by_desc = RecipeFilter {
            search: "coconut".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &by_desc)), vec![1]);
    }

    #[test]
    fn category_filters_never_match_uncategorised_recipes() {
        let mut thai = recipe(1, "Pad Thai", "2024-01-01", 3);
        thai.category = Some(CategoryRef {
            kind: "Dinner".into(),
            region: "Thai".into(),
        });
        let source = vec![thai, recipe(2, "Mystery", "2024-01-01", 3)];

        let filter = RecipeFilter {
            region: Some("Thai".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &filter)), vec![1]);

        let unset = RecipeFilter {
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_recipes(&source, &unset).len(), 2);
    }

    #[test]
    fn newest_orders_by_date_descending() {
        let source = vec![
            recipe(1, "a", "2024-01-01", 1),
            recipe(2, "b", "2025-01-01", 1),
            recipe(3, "c", "2023-06-01", 1),
        ];
        let sorted = filter_recipes(&source, &RecipeFilter::default());
        assert_eq!(ids(&sorted), vec![2, 1, 3]);

        let oldest = RecipeFilter {
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &oldest)), vec![3, 1, 2]);
        // the source is untouched
        assert_eq!(ids(&source), vec![1, 2, 3]);
    }

    #[test]
    fn highest_rated_puts_unreviewed_last_and_is_stable() {
        let unreviewed = recipe(1, "b", "2024-01-01", 1);
        let mut rated = recipe(2, "a", "2024-01-01", 1);
        rated.reviews = vec![review(4), review(5)];
        let also_unreviewed = recipe(3, "c", "2024-01-01", 1);

        let filter = RecipeFilter {
            sort: SortKey::HighestRated,
            ..Default::default()
        };
        let sorted = filter_recipes(&[unreviewed, rated, also_unreviewed], &filter);
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn difficulty_sorts_both_ways() {
        let source = vec![
            recipe(1, "a", "2024-01-01", 3),
            recipe(2, "b", "2024-01-01", 1),
            recipe(3, "c", "2024-01-01", 5),
        ];
        let asc = RecipeFilter {
            sort: SortKey::DifficultyAsc,
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &asc)), vec![2, 1, 3]);

        let desc = RecipeFilter {
            sort: SortKey::DifficultyDesc,
            difficulty: None,
            ..Default::default()
        };
        assert_eq!(ids(&filter_recipes(&source, &desc)), vec![3, 1, 2]);
    }

    #[test]
    fn sort_key_parses_wire_names() {
        assert_eq!("highest_rated".parse::<SortKey>(), Ok(SortKey::HighestRated));
        assert!("best".parse::<SortKey>().is_err());
        assert_eq!(SortKey::DifficultyDesc.to_string(), "difficulty_desc");
    }

    #[test]
    fn category_search_checks_type_and_region() {
        let categories = vec![
            Category {
                id: 1,
                kind: "Dessert".into(),
                region: "French".into(),
            },
            Category {
                id: 2,
                kind: "Soup".into(),
                region: "Japanese".into(),
            },
        ];
        let hits = filter_categories(&categories, "fren");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(filter_categories(&categories, "").len(), 2);
    }

    #[test]
    fn is_active_tracks_non_default_settings() {
        let mut filter = RecipeFilter::default();
        assert!(!filter.is_active());
        filter.sort = SortKey::Oldest;
        assert!(filter.is_active());
        filter.clear();
        assert!(!filter.is_active());
    }
}
