//! services/client/src/bin/ezchef.rs

use chrono::Utc;
use clap::{Parser, Subcommand};
use ezchef_core::domain::{
    CookbookId, Credentials, Difficulty, Recipe, RecipeId, RegistrationForm, ReviewDraft,
};
use ezchef_core::filter::{RecipeFilter, SortKey};
use ezchef_core::ports::ClientError;
use ezchef_core::validation::truncate_text;
use ezchef_lib::{
    config::Config,
    error::AppError,
    state::AppState,
    views::{CategoryListView, CookbookDetailView, CookbookListView, RecipeListView},
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ezchef")]
#[command(about = "Browse recipes, categories and cookbooks on an ezChef backend")]
struct Cli {
    /// Print raw JSON instead of a listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the session on disk
    Login {
        username: String,
        #[arg(long, env = "EZCHEF_PASSWORD", hide_env_values = true)]
        password: String,
        /// Remember the username for the next sign-in
        #[arg(long)]
        remember: bool,
    },
    /// Create an account and sign in
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, env = "EZCHEF_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "EZCHEF_PASSWORD_CONFIRM", hide_env_values = true)]
        confirm_password: String,
    },
    Logout,
    /// Show who is signed in
    Whoami,
    /// List recipes with optional filters
    Recipes {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: Option<u8>,
        /// newest, oldest, highest_rated, difficulty_asc or difficulty_desc
        #[arg(long, default_value = "newest")]
        sort: SortKey,
    },
    /// Show one recipe with its reviews
    Recipe { id: RecipeId },
    Categories {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List the signed-in user's cookbooks
    Cookbooks {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    Cookbook {
        id: CookbookId,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Review a recipe as the signed-in user
    Review {
        recipe_id: RecipeId,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
    /// Add a recipe to one of your cookbooks
    CookbookAdd {
        cookbook_id: CookbookId,
        recipe_id: RecipeId,
    },
    /// Remove a recipe from one of your cookbooks
    CookbookRemove {
        cookbook_id: CookbookId,
        recipe_id: RecipeId,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Using backend {}", config.api_url);

    // --- 2. Wire Adapters & Restore the Session ---
    let state = AppState::build(config)?;
    let status = state.session.initialize().await;
    info!("Session restored: {:?}", status);

    // --- 3. Run the Command ---
    let result = run(&state, &cli).await;
    if let Err(AppError::Client(e)) = &result {
        if state.session.recover(e).await {
            warn!("The access token was refreshed; run the command again.");
        }
    }
    result
}

async fn run(state: &AppState, cli: &Cli) -> Result<(), AppError> {
    let session = &state.session;
    let services = &state.services;

    match &cli.command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            let credentials = Credentials {
                username: username.clone(),
                password: password.clone(),
            };
            let user = session.login(&credentials, *remember).await?;
            println!("Signed in as {}", user.display_name());
        }
        Command::Register {
            username,
            email,
            first_name,
            last_name,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm {
                username: username.clone(),
                email: email.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                password: password.clone(),
                confirm_password: confirm_password.clone(),
            };
            let user = session.register(&form).await?;
            println!("Welcome, {}", user.display_name());
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
        }
        Command::Whoami => match session.current_user() {
            Some(user) if cli.json => print_json(&user)?,
            Some(user) => println!("{} <{}>", user.display_name(), user.email),
            None => {
                let hint = session
                    .remembered_username()
                    .map(|name| format!(" (last user: {})", name))
                    .unwrap_or_default();
                println!("Not signed in{}", hint);
            }
        },
        Command::Recipes {
            search,
            category,
            region,
            difficulty,
            sort,
        } => {
            let mut view = RecipeListView::new(services);
            view.load().await?;
            view.set_filter(RecipeFilter {
                search: search.clone(),
                category: category.clone(),
                region: region.clone(),
                difficulty: difficulty.and_then(Difficulty::new),
                sort: *sort,
            });
            if cli.json {
                print_json(&view.visible())?;
            } else {
                println!("{}", view.summary());
                view.visible().iter().for_each(print_recipe_line);
            }
        }
        Command::Recipe { id } => {
            let recipe = services.recipes.get(*id).await?;
            if cli.json {
                print_json(&recipe)?;
            } else {
                print_recipe_line(&recipe);
                println!("{}", recipe.description);
                for ingredient in &recipe.ingredients {
                    println!("  - {} {} {}", ingredient.amount, ingredient.unit, ingredient.name);
                }
                println!("{}", recipe.instructions);
                for review in &recipe.reviews {
                    let date = review
                        .date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    println!(
                        "  [{}/5] {} {}: {}",
                        review.rating, date, review.author, review.comment
                    );
                }
            }
        }
        Command::Categories { search } => {
            let mut view = CategoryListView::new(services);
            view.load().await?;
            view.set_search(search.clone());
            let categories = view.visible();
            if cli.json {
                print_json(&categories)?;
            } else {
                for category in categories {
                    println!("#{:<5} {} / {}", category.id, category.kind, category.region);
                }
            }
        }
        Command::Cookbooks { search } => {
            let mut view = CookbookListView::new(services, session.clone());
            view.load().await?;
            view.set_search(search.clone());
            let cookbooks = view.visible();
            if cli.json {
                print_json(&cookbooks)?;
            } else {
                for cookbook in cookbooks {
                    println!(
                        "#{:<5} {} ({} recipes) {}",
                        cookbook.id,
                        cookbook.title,
                        cookbook.recipes.len(),
                        truncate_text(&cookbook.description, 60)
                    );
                }
            }
        }
        Command::Cookbook { id, search } => {
            let mut view = CookbookDetailView::new(services, session.clone());
            view.load(*id).await?;
            view.set_search(search.clone());
            if cli.json {
                print_json(&view.cookbook())?;
            } else if let Some(cookbook) = view.cookbook() {
                println!("{}", cookbook.title);
                if !cookbook.description.is_empty() {
                    println!("{}", cookbook.description);
                }
                view.visible_recipes().iter().for_each(print_recipe_line);
            }
        }
        Command::Review {
            recipe_id,
            rating,
            comment,
        } => {
            let user = session.current_user().ok_or(ClientError::Unauthenticated)?;
            let draft = ReviewDraft {
                recipe_id: *recipe_id,
                user_id: user.user_id,
                rating: *rating,
                comment: comment.clone(),
                date: Utc::now(),
            };
            let review = services.reviews.create(&draft).await?;
            if cli.json {
                print_json(&review)?;
            } else {
                println!("Review posted for recipe {}", recipe_id);
            }
        }
        Command::CookbookAdd {
            cookbook_id,
            recipe_id,
        } => {
            let mut view = CookbookDetailView::new(services, session.clone());
            view.load(*cookbook_id).await?;
            view.add_recipe(*recipe_id).await?;
            println!("Added recipe {} to cookbook {}", recipe_id, cookbook_id);
        }
        Command::CookbookRemove {
            cookbook_id,
            recipe_id,
        } => {
            let mut view = CookbookDetailView::new(services, session.clone());
            view.load(*cookbook_id).await?;
            view.remove_recipe(*recipe_id).await?;
            println!("Removed recipe {} from cookbook {}", recipe_id, cookbook_id);
        }
    }
    Ok(())
}

fn print_recipe_line(recipe: &Recipe) {
    let added = recipe
        .date_added
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    println!(
        "#{:<5} {} [{}] {} {}",
        recipe.id,
        added,
        recipe.difficulty.label(),
        recipe.name,
        truncate_text(&recipe.description, 60)
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
