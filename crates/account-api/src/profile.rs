use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::debug;

use account_types::api::{Claims, ProfileResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// Profile of the user named by the verified token. A token whose subject
/// no longer resolves is treated as invalid.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = claims.sub.to_string();
    let row = tokio::task::spawn_blocking(move || state.db.get_user_by_id(&uid))
        .await??
        .ok_or_else(|| {
            debug!("Token subject {} has no user record", claims.sub);
            ApiError::InvalidToken
        })?;

    Ok(Json(ProfileResponse {
        profile: row.to_user(),
    }))
}
