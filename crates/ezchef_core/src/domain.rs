//! crates/ezchef_core/src/domain.rs
//!
//! Defines the core data structures shared by every part of the client.
//! These mirror the JSON documents the ezChef backend sends and accepts, so
//! they carry serde attributes; the backend's older snake_case field names
//! are accepted as aliases.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type UserId = i64;
pub type RecipeId = i64;
pub type CategoryId = i64;
pub type CookbookId = i64;
pub type ReviewId = i64;

//=========================================================================================
// Session
//=========================================================================================

/// The lifecycle state of the client's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Loading,
    Authenticated,
}

/// The client's record of the currently authenticated user and tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub status: AuthStatus,
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// The profile of a registered user, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "id", alias = "user_id")]
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "f_name")]
    pub first_name: String,
    #[serde(default, alias = "l_name")]
    pub last_name: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Login form fields.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up form fields. Only used locally; the wire body is built from it
/// after validation.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

//=========================================================================================
// Recipes and Categories
//=========================================================================================

/// A recipe difficulty level between 1 (very easy) and 5 (very hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Easy",
            2 => "Easy",
            3 => "Medium",
            4 => "Hard",
            _ => "Very Hard",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| {
            format!(
                "difficulty must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                level
            )
        })
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (type, region) pairing that classifies a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "type", alias = "r_type", default)]
    pub kind: String,
    #[serde(alias = "r_region", default)]
    pub region: String,
}

/// A category as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "categoryId", alias = "category_id")]
    pub id: CategoryId,
    #[serde(rename = "type", alias = "r_type", default)]
    pub kind: String,
    #[serde(alias = "r_region", default)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(default, alias = "calorie_count")]
    pub calorie_count: Option<u32>,
    #[serde(default, alias = "protein_count")]
    pub protein_count: Option<u32>,
    #[serde(default, alias = "serving_size")]
    pub serving_size: Option<String>,
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(alias = "ingredient_name", alias = "ingredientName")]
    pub name: String,
    #[serde(default, alias = "quantity_amount")]
    pub amount: f64,
    #[serde(default, alias = "unit_name")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, alias = "reviewId", alias = "review_id")]
    pub id: Option<ReviewId>,
    #[serde(default, alias = "recipe")]
    pub recipe_id: Option<RecipeId>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(
        default,
        alias = "date_created",
        alias = "dateCreated",
        deserialize_with = "flexible_timestamp"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, alias = "username")]
    pub author: String,
}

/// A named dish with ingredients, instructions, category, difficulty and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(alias = "recipeId", alias = "recipe_id")]
    pub id: RecipeId,
    #[serde(default, alias = "recipe_name")]
    pub name: String,
    #[serde(default, alias = "recipe_description")]
    pub description: String,
    #[serde(alias = "recipe_difficulty")]
    pub difficulty: Difficulty,
    #[serde(
        default,
        alias = "date_added",
        deserialize_with = "flexible_timestamp"
    )]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Recipe {
    /// Mean of the review ratings, or 0 when the recipe has no reviews.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        f64::from(sum) / self.reviews.len() as f64
    }
}

/// The body sent when creating or updating a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: CategoryRef,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub date_added: DateTime<Utc>,
}

//=========================================================================================
// Cookbooks and Reviews
//=========================================================================================

/// A user-owned, named collection of recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookbook {
    #[serde(alias = "cookbookId", alias = "cb_id")]
    pub id: CookbookId,
    #[serde(alias = "cb_title")]
    pub title: String,
    #[serde(default, alias = "cb_description")]
    pub description: String,
    #[serde(default, alias = "userId", alias = "owner")]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default, alias = "num_of_saves")]
    pub num_of_saves: u32,
}

impl Cookbook {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    pub fn contains(&self, recipe_id: RecipeId) -> bool {
        self.recipes.iter().any(|r| r.id == recipe_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookbookDraft {
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub num_of_saves: u32,
}

/// Partial update of a cookbook's title and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookbookUpdate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

//=========================================================================================
// Timestamp Parsing
//=========================================================================================

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` timestamp
/// (taken as UTC), or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
    }
}
