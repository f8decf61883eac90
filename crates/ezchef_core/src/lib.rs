pub mod domain;
pub mod filter;
pub mod ports;
pub mod validation;

pub use domain::{
    AuthStatus, Category, CategoryRef, Cookbook, CookbookDraft, CookbookUpdate, Credentials,
    Difficulty, Ingredient, Recipe, RecipeDraft, RegistrationForm, Review, ReviewDraft, Session,
    UserProfile,
};
pub use filter::{filter_categories, filter_cookbooks, filter_recipes, RecipeFilter, SortKey};
pub use ports::{ApiRequest, ClientError, HttpService, Method, PortResult, SessionStorage};
