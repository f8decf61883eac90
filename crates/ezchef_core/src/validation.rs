//! crates/ezchef_core/src/validation.rs
//!
//! Local form validation. A failure here is a `ClientError::Validation` and
//! the request is never sent.

use crate::domain::{CookbookUpdate, RecipeDraft, RegistrationForm, ReviewDraft};
use crate::ports::{ClientError, PortResult};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MISSING_REQUIRED: &str = "Please fill in all required fields";

/// Checks the sign-up form. Password confirmation is checked first.
pub fn validate_registration(form: &RegistrationForm) -> PortResult<()> {
    if form.password != form.confirm_password {
        return Err(ClientError::validation(PASSWORD_MISMATCH));
    }

    let required = [
        &form.username,
        &form.email,
        &form.first_name,
        &form.last_name,
        &form.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ClientError::validation(MISSING_REQUIRED));
    }

    Ok(())
}

pub fn validate_recipe(draft: &RecipeDraft) -> PortResult<()> {
    let blank = draft.name.trim().is_empty()
        || draft.description.trim().is_empty()
        || draft.category.kind.trim().is_empty()
        || draft.instructions.trim().is_empty();
    if blank || draft.ingredients.is_empty() {
        return Err(ClientError::validation(
            "Please fill in all required fields and add at least one ingredient",
        ));
    }
    if draft.ingredients.iter().any(|i| i.name.trim().is_empty()) {
        return Err(ClientError::validation("Every ingredient needs a name"));
    }
    Ok(())
}

pub fn validate_cookbook_title(title: &str) -> PortResult<()> {
    if title.trim().is_empty() {
        return Err(ClientError::validation("Cookbook title cannot be empty"));
    }
    Ok(())
}

pub fn validate_cookbook_update(update: &CookbookUpdate) -> PortResult<()> {
    validate_cookbook_title(&update.title)
}

pub fn validate_review(draft: &ReviewDraft) -> PortResult<()> {
    if !(1..=5).contains(&draft.rating) || draft.comment.trim().is_empty() {
        return Err(ClientError::validation(
            "Please provide both a rating and a comment",
        ));
    }
    Ok(())
}

/// Shortens `text` to `max_chars` characters, appending an ellipsis.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}
