use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct NewsletterRequest { pub email: String, pub name: Option<String> }

#[derive(ToSchema)]
pub struct CategoryRequest { pub name: String, pub slug: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct ServiceRequest {
    pub title: String,
    pub slug: Option<String>,
    pub category_id: Uuid,
    pub description: String,
    pub short_description: String,
    pub image: Option<String>,
    pub is_featured: Option<bool>,
    /// Decimal string, two places at most.
    pub price: Option<String>,
    pub features: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct StatusChangeRequest {
    /// One of `new`, `in_progress`, `responded`, `closed`.
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::profile,
        crate::routes::auth::update_profile,
        crate::routes::auth::list_users,
        crate::routes::auth::delete_user,
        crate::routes::catalog::list_services,
        crate::routes::catalog::featured,
        crate::routes::catalog::by_category,
        crate::routes::catalog::service_detail,
        crate::routes::catalog::categories,
        crate::routes::catalog::category_detail,
        crate::routes::intake::submit_message,
        crate::routes::intake::subscribe,
        crate::routes::admin::create_category,
        crate::routes::admin::update_category,
        crate::routes::admin::delete_category,
        crate::routes::admin::create_service,
        crate::routes::admin::update_service,
        crate::routes::admin::delete_service,
        crate::routes::admin::update_message_status,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProfileUpdateRequest,
            ContactRequest,
            NewsletterRequest,
            CategoryRequest,
            ServiceRequest,
            StatusChangeRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "catalog"),
        (name = "contact"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
