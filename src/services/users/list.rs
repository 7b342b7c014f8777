use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::requests::{UserListParams, UserListQuery},
};
use crate::services::access::{OrInternal, Outcome};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;

    let users = storage
        .list_users_with_pagination(UserListQuery::from(query))
        .await
        .or_internal("Failed to retrieve user list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        users,
        "User list retrieved successfully",
    )))
}
