use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

pub const ADMIN_PASSCODE_HEADER: &str = "x-admin-passcode";

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub scheme: &'static str,
}

fn presented_credential(headers: &HeaderMap) -> Option<&str> {
    if let Some(passcode) = headers
        .get(ADMIN_PASSCODE_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(passcode);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credential = presented_credential(req.headers()).ok_or(AppError::Unauthorized)?;

    if !state.admin.check_admin(credential) {
        tracing::warn!(path = %req.uri().path(), "Admin check failed");
        return Err(AppError::Unauthorized);
    }

    let session = AdminSession {
        scheme: state.admin.scheme(),
    };
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
