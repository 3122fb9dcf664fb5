use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub username: String, pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub category: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::verify,
        crate::routes::events::list_events,
        crate::routes::events::get_event,
        crate::routes::events::create_event,
        crate::routes::events::vote,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            CreateEventRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "events")
    )
)]
pub struct ApiDoc;
