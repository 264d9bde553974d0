use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct License {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub contact: Contact,
    pub license: License,
    pub docs_url: String,
}

pub async fn info(State(state): State<SharedState>) -> Json<AppMetadata> {
    let app = &state.config.app;
    Json(AppMetadata {
        name: app.name.clone(),
        description: app.description.clone(),
        version: app.version.clone(),
        contact: Contact {
            name: app.contact_name.clone(),
            email: app.contact_email.clone(),
        },
        license: License {
            name: app.license.clone(),
        },
        docs_url: app.docs_url.clone(),
    })
}

pub async fn health() -> &'static str {
    "ok"
}
