//! Viewer extractors - who is asking, and are they the admin.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use myco_core::domain::Viewer;

use crate::middleware::error::AppError;
use crate::state::AppState;

#[cfg(feature = "auth")]
fn signed_in_email(req: &HttpRequest) -> Result<Option<String>, AppError> {
    use super::auth::OptionalIdentity;

    let OptionalIdentity(identity) = OptionalIdentity::from_request(req, &mut Payload::None)
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(identity.and_then(|i| {
        tracing::debug!(subject = %i.subject, "Request carries a signed-in identity");
        i.email
    }))
}

#[cfg(not(feature = "auth"))]
fn signed_in_email(_req: &HttpRequest) -> Result<Option<String>, AppError> {
    Ok(None)
}

fn resolve(req: &HttpRequest) -> Result<Viewer, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::Internal("AppState not found in app data".to_string())
    })?;

    let email = signed_in_email(req)?;
    Ok(Viewer::resolve(email, state.admin_policy.as_ref()))
}

/// The current viewer; anonymous when there is no usable token.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Viewer);

impl FromRequest for CurrentViewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(CurrentViewer))
    }
}

/// Only the site administrator gets through: 401 when not signed in,
/// 403 when signed in as someone else.
#[derive(Debug, Clone)]
pub struct AdminViewer(pub Viewer);

impl FromRequest for AdminViewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = resolve(req).and_then(|viewer| {
            if viewer.is_admin {
                Ok(AdminViewer(viewer))
            } else if viewer.is_signed_in() {
                tracing::warn!("Non-admin viewer attempted an admin action");
                Err(AppError::Forbidden)
            } else {
                Err(AppError::Unauthorized)
            }
        });
        ready(result)
    }
}
