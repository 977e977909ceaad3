use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;

// --- Role Based Access Guards ---
//
// Roles are a closed enum carried in the verified claims; every guard is a
// capability check against that enum rather than a string comparison.

/// Helper to extract, validate user from request extensions and insert them back into the request
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_roles(req, next, &[Role::Admin], "Admin access required").await
}

/// Teacher-only guard (session management and all three capture protocols).
pub async fn allow_teacher(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_roles(req, next, &[Role::Teacher], "Teacher access required").await
}

/// Guard for the reporting surfaces shared by admins and teachers.
pub async fn allow_admin_or_teacher(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_roles(
        req,
        next,
        &[Role::Admin, Role::Teacher],
        "Admin or Teacher access required",
    )
    .await
}

/// Base guard the public guards build upon. Empty role set denies (fail-safe).
async fn allow_roles(
    req: Request<Body>,
    next: Next,
    allowed: &[Role],
    failure_msg: &str,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if allowed.contains(&user.0.role) {
        Ok(next.run(req).await)
    } else {
        Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))))
    }
}
