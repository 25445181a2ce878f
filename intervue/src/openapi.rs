//! OpenAPI documentation configuration.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::experiences::create_experience,
        api::handlers::experiences::list_experiences,
        api::handlers::experiences::get_experience,
        api::handlers::experiences::delete_experience,
    ),
    components(schemas(
        api::models::auth::RegisterRequest,
        api::models::auth::LoginRequest,
        api::models::auth::AuthResponse,
        api::models::users::UserResponse,
        api::models::experiences::ExperienceCreate,
        api::models::experiences::ExperienceResponse,
        api::models::experiences::PostedBy,
        api::models::experiences::DeleteExperienceResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "authentication", description = "Registration and login"),
        (name = "experiences", description = "Interview experience records"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}
