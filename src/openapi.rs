use utoipa::openapi::info::{ContactBuilder, License};
use utoipa::openapi::server::Server;
use utoipa::OpenApi;

use crate::config::Config;
use crate::models::Role;
use crate::routes::{profiles, users};
use crate::schemas::{
    ProfileCreate, ProfileResponse, ProfileUpdate, UserCreate, UserResponse, UserUpdate,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        users::list,
        users::create,
        users::get,
        users::update,
        users::delete,
        users::profile,
        profiles::list,
        profiles::create,
        profiles::get,
        profiles::update,
        profiles::delete,
    ),
    components(schemas(
        Role,
        UserCreate,
        UserUpdate,
        UserResponse,
        ProfileCreate,
        ProfileUpdate,
        ProfileResponse,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "profiles", description = "Personal data attached to a user"),
    )
)]
pub struct ApiDoc;

/// The generated document with runtime metadata filled in. Paths are
/// relative to the single server entry, which points at the API prefix.
pub fn document(config: &Config) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let app = &config.app;

    doc.info.title = app.name.clone();
    doc.info.description = Some(app.description.clone());
    doc.info.version = app.version.clone();
    doc.info.contact = Some(
        ContactBuilder::new()
            .name(Some(app.contact_name.clone()))
            .email(Some(app.contact_email.clone()))
            .build(),
    );
    doc.info.license = Some(License::new(app.license.clone()));

    let base = if config.api_prefix.is_empty() {
        "/".to_string()
    } else {
        config.api_prefix.clone()
    };
    doc.servers = Some(vec![Server::new(base)]);

    doc
}
