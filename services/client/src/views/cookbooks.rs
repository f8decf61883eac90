//! services/client/src/views/cookbooks.rs
//!
//! The signed-in user's cookbooks, and one cookbook in detail. Mutations are
//! gated on the current session; ownership is checked locally when the
//! backend reports an owner and otherwise left to the backend.

use super::{inline_message, ViewScope};
use crate::services::{CookbookService, Services};
use crate::session::SessionStore;
use ezchef_core::domain::{
    Cookbook, CookbookDraft, CookbookId, CookbookUpdate, Recipe, RecipeId, UserProfile,
};
use ezchef_core::filter::{filter_cookbooks, filter_recipes, RecipeFilter};
use ezchef_core::ports::{ClientError, PortResult};
use tracing::info;

fn require_user(session: &SessionStore) -> PortResult<UserProfile> {
    session.current_user().ok_or(ClientError::Unauthenticated)
}

fn require_owner(cookbook: &Cookbook, user: &UserProfile) -> PortResult<()> {
    if cookbook.owner_id.is_some() && !cookbook.is_owned_by(user.user_id) {
        return Err(ClientError::validation("You can only modify your own cookbooks"));
    }
    Ok(())
}

pub struct CookbookListView {
    cookbooks: CookbookService,
    session: SessionStore,
    source: Vec<Cookbook>,
    search: String,
    loading: bool,
    error: Option<String>,
    scope: ViewScope,
}

impl CookbookListView {
    pub fn new(services: &Services, session: SessionStore) -> Self {
        let scope = ViewScope::new();
        Self {
            cookbooks: services.cookbooks.with_cancel(scope.token()),
            session,
            source: Vec::new(),
            search: String::new(),
            loading: false,
            error: None,
            scope,
        }
    }

    /// Loads the current user's cookbooks. Fails with `Unauthenticated`
    /// without touching the network when nobody is signed in.
    pub async fn load(&mut self) -> PortResult<()> {
        let user = require_user(&self.session)?;
        self.loading = true;
        self.error = None;
        let result = self.cookbooks.for_user(user.user_id).await;
        self.loading = false;

        match result {
            Ok(cookbooks) => {
                self.source = cookbooks;
                Ok(())
            }
            Err(e) => {
                self.error = inline_message("fetching cookbooks", &e);
                Err(e)
            }
        }
    }

    /// Creates a cookbook owned by the current user and adds it to the list.
    pub async fn create_cookbook(
        &mut self,
        title: &str,
        description: &str,
    ) -> PortResult<Cookbook> {
        let user = require_user(&self.session)?;
        let draft = CookbookDraft {
            title: title.to_string(),
            description: description.to_string(),
            user_id: user.user_id,
            num_of_saves: 0,
        };
        let cookbook = self.cookbooks.create(&draft).await?;
        self.source.push(cookbook.clone());
        Ok(cookbook)
    }

    pub async fn delete_cookbook(&mut self, id: CookbookId) -> PortResult<()> {
        let user = require_user(&self.session)?;
        if let Some(cookbook) = self.source.iter().find(|c| c.id == id) {
            require_owner(cookbook, &user)?;
        }
        self.cookbooks.delete(id).await?;
        self.source.retain(|c| c.id != id);
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn visible(&self) -> Vec<Cookbook> {
        filter_cookbooks(&self.source, &self.search)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn close(self) {
        self.scope.cancel();
    }
}

pub struct CookbookDetailView {
    cookbooks: CookbookService,
    session: SessionStore,
    cookbook: Option<Cookbook>,
    search: String,
    available: Vec<Recipe>,
    loading: bool,
    error: Option<String>,
    scope: ViewScope,
}

impl CookbookDetailView {
    pub fn new(services: &Services, session: SessionStore) -> Self {
        let scope = ViewScope::new();
        Self {
            cookbooks: services.cookbooks.with_cancel(scope.token()),
            session,
            cookbook: None,
            search: String::new(),
            available: Vec::new(),
            loading: false,
            error: None,
            scope,
        }
    }

    pub async fn load(&mut self, id: CookbookId) -> PortResult<()> {
        self.loading = true;
        self.error = None;
        let result = self.cookbooks.get(id).await;
        self.loading = false;

        match result {
            Ok(cookbook) => {
                self.cookbook = Some(cookbook);
                Ok(())
            }
            Err(e) => {
                self.error = inline_message("fetching cookbook", &e);
                Err(e)
            }
        }
    }

    /// Fetches the recipes that could still be added to this cookbook.
    pub async fn load_available(&mut self) -> PortResult<&[Recipe]> {
        let id = self.loaded()?.id;
        match self.cookbooks.available_recipes(id).await {
            Ok(recipes) => {
                self.available = recipes;
                Ok(&self.available)
            }
            Err(e) => {
                self.error = inline_message("fetching available recipes", &e);
                Err(e)
            }
        }
    }

    pub async fn add_recipe(&mut self, recipe_id: RecipeId) -> PortResult<()> {
        let id = self.editable()?.id;
        self.cookbooks.add_recipe(id, recipe_id).await?;
        if let Some(position) = self.available.iter().position(|r| r.id == recipe_id) {
            let recipe = self.available.remove(position);
            if let Some(cookbook) = self.cookbook.as_mut() {
                cookbook.recipes.push(recipe);
            }
        }
        info!("Added recipe {} to cookbook {}", recipe_id, id);
        Ok(())
    }

    pub async fn remove_recipe(&mut self, recipe_id: RecipeId) -> PortResult<()> {
        let id = self.editable()?.id;
        self.cookbooks.remove_recipe(id, recipe_id).await?;
        if let Some(cookbook) = self.cookbook.as_mut() {
            cookbook.recipes.retain(|r| r.id != recipe_id);
        }
        info!("Removed recipe {} from cookbook {}", recipe_id, id);
        Ok(())
    }

    pub async fn update_details(&mut self, title: &str, description: &str) -> PortResult<()> {
        let id = self.editable()?.id;
        let update = CookbookUpdate {
            title: title.to_string(),
            description: description.to_string(),
        };
        let updated = self.cookbooks.update(id, &update).await?;
        if let Some(cookbook) = self.cookbook.as_mut() {
            cookbook.title = updated.title;
            cookbook.description = updated.description;
        }
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Recipes of the loaded cookbook matching the search, newest first.
    pub fn visible_recipes(&self) -> Vec<Recipe> {
        let Some(cookbook) = self.cookbook.as_ref() else {
            return Vec::new();
        };
        let filter = RecipeFilter {
            search: self.search.clone(),
            ..RecipeFilter::default()
        };
        filter_recipes(&cookbook.recipes, &filter)
    }

    pub fn cookbook(&self) -> Option<&Cookbook> {
        self.cookbook.as_ref()
    }

    pub fn available(&self) -> &[Recipe] {
        &self.available
    }

    /// Whether the signed-in user may modify the loaded cookbook.
    pub fn can_edit(&self) -> bool {
        self.editable().is_ok()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn close(self) {
        self.scope.cancel();
    }

    fn loaded(&self) -> PortResult<&Cookbook> {
        self.cookbook
            .as_ref()
            .ok_or_else(|| ClientError::validation("No cookbook loaded"))
    }

    fn editable(&self) -> PortResult<&Cookbook> {
        let user = require_user(&self.session)?;
        let cookbook = self.loaded()?;
        require_owner(cookbook, &user)?;
        Ok(cookbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserProfile {
        UserProfile {
            user_id: id,
            username: format!("user{}", id),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    fn cookbook(owner_id: Option<i64>) -> Cookbook {
        Cookbook {
            id: 1,
            title: "Weeknights".into(),
            description: String::new(),
            owner_id,
            recipes: Vec::new(),
            num_of_saves: 0,
        }
    }

    #[test]
    fn owner_may_edit() {
        assert!(require_owner(&cookbook(Some(7)), &user(7)).is_ok());
    }

    #[test]
    fn other_users_are_refused() {
        let err = require_owner(&cookbook(Some(7)), &user(8)).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn unknown_owner_defers_to_backend() {
        assert!(require_owner(&cookbook(None), &user(8)).is_ok());
    }
}
