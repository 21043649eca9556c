use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{hash_password, StaffUser},
    models::user::*,
    routes::AppState,
};
use axum::{extract::State, http::StatusCode, Json};

pub async fn create_user(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    // Validate input
    if req.username.trim().len() < 3 {
        return Err(AppError::field("username", "Username must be at least 3 characters"));
    }
    if req.password.len() < 8 {
        return Err(AppError::field("password", "Password must be at least 8 characters"));
    }
    if matches!(&req.email, Some(email) if !email.contains('@')) {
        return Err(AppError::field("email", "Enter a valid email address."));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        &state.pool,
        &user_id,
        req.username.trim(),
        req.email.as_deref(),
        &password_hash,
        req.is_staff,
    )
    .await?;

    tracing::info!(user = %user.username, created_by = %staff.username, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}
