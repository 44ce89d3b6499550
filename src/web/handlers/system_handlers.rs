// src/web/handlers/system_handlers.rs
use rocket::http::{Cookie, CookieJar};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::render::render_page;
use crate::web::session_store::SessionStore;
use crate::web::types::{HealthResponse, SESSION_COOKIE};

/// Session id carried by the cookie, if any
pub fn existing_session_id(jar: &CookieJar<'_>) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Session id from the cookie, or a fresh one stored back into the jar
pub fn session_id(jar: &CookieJar<'_>) -> Uuid {
    if let Some(id) = existing_session_id(jar) {
        return id;
    }

    let id = Uuid::new_v4();
    info!("Starting new session {}", id);
    jar.add(Cookie::new(SESSION_COOKIE, id.to_string()));
    id
}

/// Render without creating a session; unknown ids get a blank page
pub async fn page_handler(store: &SessionStore, id: Option<Uuid>) -> RawHtml<String> {
    debug!("Rendering page for session {:?}", id);
    RawHtml(store.view(id, render_page).await)
}

pub async fn toggle_view_handler(store: &SessionStore, id: Uuid) {
    store.update(id, |session| session.toggle_text_view()).await;
}

pub async fn reset_handler(store: &SessionStore, id: Uuid) {
    store.update(id, |session| session.reset_ui()).await;
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
