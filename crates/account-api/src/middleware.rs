use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;

/// Extract and validate the bearer token from the Authorization header,
/// making its `Claims` available to the handler as an extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::InvalidToken
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// An absent header or a bare `Bearer` counts as no token; any other shape
/// is an invalid one.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(ApiError::MissingToken);
    };
    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Err(ApiError::MissingToken),
        (Some(scheme), None, _) if scheme.eq_ignore_ascii_case("bearer") => {
            Err(ApiError::MissingToken)
        }
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ApiError::InvalidToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");

        let headers = with_auth("bearer abc");
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn absent_or_empty_is_missing() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(ApiError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&with_auth("")),
            Err(ApiError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&with_auth("Bearer ")),
            Err(ApiError::MissingToken)
        ));
    }

    #[test]
    fn other_schemes_are_invalid() {
        assert!(matches!(
            bearer_token(&with_auth("Basic dXNlcjpwYXNz")),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            bearer_token(&with_auth("Bearer a b")),
            Err(ApiError::InvalidToken)
        ));
    }
}
