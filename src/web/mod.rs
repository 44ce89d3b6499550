// src/web/mod.rs
//! Rocket front-end serving the upload page, one session per browser

pub mod handlers;
pub mod session_store;
pub mod types;

pub use handlers::*;
pub use session_store::SessionStore;
pub use types::*;

use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, uri, Build, Request, Rocket, State};
use tracing::{error, info};

use crate::core::{ConfigManager, ServiceClient};
use crate::types::ProcessAction;

#[get("/")]
pub async fn index(jar: &CookieJar<'_>, store: &State<SessionStore>) -> RawHtml<String> {
    page_handler(store, existing_session_id(jar)).await
}

#[post("/upload", data = "<form>")]
pub async fn upload(
    mut form: Form<ResumeUploadForm<'_>>,
    jar: &CookieJar<'_>,
    store: &State<SessionStore>,
    service: &State<ServiceClient>,
) -> Redirect {
    let id = session_id(jar);

    match read_upload(&mut form.file).await {
        Ok(file) => upload_handler(store, service.inner(), id, file).await,
        Err(e) => {
            store
                .update(id, |session| session.fail_upload(&format!("{:#}", e)))
                .await
        }
    }

    Redirect::to(uri!(index))
}

#[post("/actions/generate-questions")]
pub async fn generate_questions(
    jar: &CookieJar<'_>,
    store: &State<SessionStore>,
    service: &State<ServiceClient>,
) -> Redirect {
    let id = session_id(jar);
    process_handler(store, service.inner(), id, ProcessAction::GenerateQuestions).await;
    Redirect::to(uri!(index))
}

#[post("/actions/analyze-experience")]
pub async fn analyze_experience(
    jar: &CookieJar<'_>,
    store: &State<SessionStore>,
    service: &State<ServiceClient>,
) -> Redirect {
    let id = session_id(jar);
    process_handler(store, service.inner(), id, ProcessAction::AnalyzeExperience).await;
    Redirect::to(uri!(index))
}

#[post("/actions/toggle-view")]
pub async fn toggle_view(jar: &CookieJar<'_>, store: &State<SessionStore>) -> Redirect {
    toggle_view_handler(store, session_id(jar)).await;
    Redirect::to(uri!(index))
}

#[post("/actions/reset")]
pub async fn reset(jar: &CookieJar<'_>, store: &State<SessionStore>) -> Redirect {
    reset_handler(store, session_id(jar)).await;
    Redirect::to(uri!(index))
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    health_handler().await
}

#[catch(413)]
pub async fn payload_too_large(request: &Request<'_>) -> Redirect {
    if let Some(store) = request.rocket().state::<SessionStore>() {
        let id = session_id(request.cookies());
        store
            .update(id, |session| session.reject_oversized_upload())
            .await;
    }
    Redirect::to(uri!(index))
}

#[catch(500)]
pub fn internal_error() -> RawHtml<&'static str> {
    RawHtml(r#"<div class="alert alert-danger">Internal server error. Please try again.</div>"#)
}

pub fn build_rocket(config: &ConfigManager, service: ServiceClient) -> Rocket<Build> {
    // the form limit leaves room for multipart framing around the file
    let limits = Limits::default()
        .limit("file", config.max_upload_bytes.bytes())
        .limit("data-form", (config.max_upload_bytes + 64 * 1024).bytes());

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .manage(SessionStore::new(config.session_ttl()))
        .manage(service)
        .register("/", catchers![payload_too_large, internal_error])
        .mount(
            "/",
            routes![
                index,
                upload,
                generate_questions,
                analyze_experience,
                toggle_view,
                reset,
                health,
            ],
        )
}

pub async fn start_web_server(config: ConfigManager, service: ServiceClient) -> Result<()> {
    info!("Starting resume upload front-end");
    info!("Server: http://{}:{}", config.address, config.port);
    info!("Extraction service: {}", service.base_url());

    if let Err(e) = build_rocket(&config, service).launch().await {
        error!("Web server stopped: {}", e);
        anyhow::bail!("Web server failed: {}", e);
    }

    Ok(())
}
