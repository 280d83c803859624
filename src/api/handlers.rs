//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheEntry;
use crate::context::MemoContext;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, EntryView, HealthResponse, NotifyResponse, PutEntryRequest,
    PutResponse, StatsResponse, StoreResponse,
};
use crate::storage::Provider;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared memoization context
    pub ctx: MemoContext,
}

impl AppState {
    /// Creates a new AppState around an existing context.
    pub fn new(ctx: MemoContext) -> Self {
        Self { ctx }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(MemoContext::from_config(config))
    }
}

/// Handler for GET /stores/:provider/:id
///
/// Lists a cache store's entries in insertion order. A store nothing has
/// opened yet is read from its backend without being registered.
pub async fn store_handler(
    State(state): State<AppState>,
    Path((provider, id)): Path<(Provider, String)>,
) -> Json<StoreResponse> {
    let store = state.ctx.registry().peek(&id, provider);
    Json(StoreResponse::from_store(&store))
}

/// Handler for GET /stores/:provider/:id/entries/:key
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path((provider, id, key)): Path<(Provider, String, String)>,
) -> Result<Json<EntryView>> {
    let store = state.ctx.registry().peek(&id, provider);
    let entry = store.get(&key).ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryView::new(key, entry)))
}

/// Handler for PUT /stores/:provider/:id/entries/:key
///
/// Stores a value stamped with the current time.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Path((provider, id, key)): Path<(Provider, String, String)>,
    Json(req): Json<PutEntryRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let store = state.ctx.registry().get_instance(&id, provider);
    let entry = CacheEntry::new(req.value, state.ctx.now_ms()).with_ttl(req.ttl);
    store.put(key.clone(), entry)?;

    Ok(Json(PutResponse::new(key)))
}

/// Handler for DELETE /stores/:provider/:id/entries/:key
pub async fn delete_entry_handler(
    State(state): State<AppState>,
    Path((provider, id, key)): Path<(Provider, String, String)>,
) -> Result<Json<DeleteResponse>> {
    if state.ctx.registry().peek(&id, provider).get(&key).is_none() {
        return Err(CacheError::NotFound(key));
    }

    let store = state.ctx.registry().get_instance(&id, provider);
    store.remove(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /stores/:provider/:id
pub async fn clear_handler(
    State(state): State<AppState>,
    Path((provider, id)): Path<(Provider, String)>,
) -> Result<Json<ClearResponse>> {
    let store = state.ctx.registry().get_instance(&id, provider);
    let removed = store.size();
    store.clear()?;

    Ok(Json(ClearResponse::new(id, provider, removed)))
}

/// Handler for POST /notify
///
/// Fires the notification channel, which triggers the sweeper.
pub async fn notify_handler(State(state): State<AppState>) -> Json<NotifyResponse> {
    Json(NotifyResponse {
        listeners: state.ctx.notify(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.ctx.stats();
    Json(StatsResponse::new(&stats, state.ctx.registry().len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
