//! Shared fixtures for the wiremock-backed integration tests.
#![allow(dead_code)]

use ezchef_core::ports::{keys, HttpService, SessionStorage};
use ezchef_lib::adapters::{HttpAdapter, MemoryStorage};
use ezchef_lib::config::Config;
use ezchef_lib::state::AppState;
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub fn config_for(server: &MockServer) -> Config {
    Config::for_api_url(Url::parse(&server.uri()).expect("mock server uri"))
}

pub fn adapter(server: &MockServer, storage: Arc<MemoryStorage>) -> Arc<HttpAdapter> {
    Arc::new(HttpAdapter::new(&config_for(server), storage).expect("http adapter"))
}

/// App state against `server`, backed by in-memory storage.
pub fn app(server: &MockServer) -> (AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let http: Arc<dyn HttpService> = adapter(server, storage.clone());
    let state = AppState::with_adapters(config_for(server), storage.clone(), http);
    (state, storage)
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "f_name": "Ana",
        "l_name": "Lopez",
    })
}

/// Seeds `storage` as if a previous run had logged in.
pub fn seed_session(storage: &MemoryStorage, access: &str, refresh: Option<&str>, user: &Value) {
    storage.set(keys::AUTH_TOKEN, access).unwrap();
    if let Some(refresh) = refresh {
        storage.set(keys::REFRESH_TOKEN, refresh).unwrap();
    }
    storage.set(keys::USER, &user.to_string()).unwrap();
}

pub fn recipe_json(id: i64, name: &str, difficulty: u8, date: &str, ratings: &[u8]) -> Value {
    let reviews: Vec<Value> = ratings
        .iter()
        .map(|r| json!({ "rating": r, "comment": "ok" }))
        .collect();
    json!({
        "id": id,
        "name": name,
        "description": format!("{} description", name),
        "difficulty": difficulty,
        "dateAdded": date,
        "category": { "type": "Dinner", "region": "Italian" },
        "reviews": reviews,
    })
}
