//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users?limit=10&offset=0
//! POST   /api/v1/users {"email":"ada@example.com","name":"Ada"}
//! GET    /api/v1/users/{userId}
//! PUT    /api/v1/users/{userId} {"name":"Ada Lovelace","isActive":false}
//! DELETE /api/v1/users/{userId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::SecondsFormat;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, NewUser, User, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, field_error, parse_user_id, validate_email, validate_name,
};

/// User representation returned by every user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = Uuid)]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub is_active: bool,
    #[schema(format = DateTime)]
    pub created_at: String,
    #[schema(format = DateTime)]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email,
            name: value.name,
            avatar: value.avatar,
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            updated_at: value.updated_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        validate_email(&value.email)?;
        validate_name(&value.name)?;
        Ok(Self {
            email: value.email,
            name: value.name,
            avatar: value.avatar,
        })
    }
}

/// Request body for `PUT /api/v1/users/{userId}`; absent fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        if let Some(email) = value.email.as_deref() {
            validate_email(email)?;
        }
        if let Some(name) = value.name.as_deref() {
            validate_name(name)?;
        }
        Ok(Self {
            email: value.email,
            name: value.name,
            avatar: value.avatar,
            is_active: value.is_active,
        })
    }
}

/// Query parameters for `GET /api/v1/users`.
///
/// Signed so negative values reach validation instead of failing
/// deserialisation with an opaque message.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page size, 1 to 100. Defaults to 10.
    pub limit: Option<i64>,
    /// Number of users to skip. Defaults to 0.
    pub offset: Option<i64>,
}

const LIMIT: FieldName = FieldName::new("limit");
const OFFSET: FieldName = FieldName::new("offset");

fn non_negative(value: Option<i64>, field: FieldName, message: &str) -> Result<Option<usize>, Error> {
    value
        .map(usize::try_from)
        .transpose()
        .map_err(|_| field_error(field, ValidationCode::InvalidPagination, message))
}

impl TryFrom<ListUsersQuery> for PageRequest {
    type Error = Error;

    fn try_from(value: ListUsersQuery) -> Result<Self, Self::Error> {
        let limit = non_negative(value.limit, LIMIT, "limit must be between 1 and 100")?;
        let offset = non_negative(value.offset, OFFSET, "offset must not be negative")?;
        PageRequest::from_optional(limit, offset).map_err(|err| {
            Error::invalid_request(format!("invalid pagination: {err}")).with_details(json!({
                "field": "limit",
                "code": "invalid_pagination",
            }))
        })
    }
}

/// Pagination metadata returned alongside a page of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub limit: usize,
    pub offset: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Response body for `GET /api/v1/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PaginationResponse,
}

impl From<Page<User>> for UsersResponse {
    fn from(page: Page<User>) -> Self {
        let pagination = PaginationResponse {
            limit: page.limit(),
            offset: page.offset(),
            total: page.total(),
            has_more: page.has_more(),
        };
        Self {
            users: page.into_items().into_iter().map(UserResponse::from).collect(),
            pagination,
        }
    }
}

/// List users one page at a time.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UsersResponse),
        (status = 400, description = "Invalid pagination parameters", body = Error),
        (status = 500, description = "Listing failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<UsersResponse>> {
    let page = PageRequest::try_from(query.into_inner())?;
    let users = state.users_query.list_users(page).await?;
    Ok(web::Json(UsersResponse::from(users)))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Identifier collision", body = Error),
        (status = 500, description = "Creation failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let input = NewUser::try_from(payload.into_inner())?;
    let user = state.users_command.create_user(input).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = Uuid, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Lookup failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/{userId}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Apply a partial update to a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = Uuid, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Update failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{userId}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path.into_inner())?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users_command.update_user(&id, patch).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = Uuid, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Deletion failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{userId}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
