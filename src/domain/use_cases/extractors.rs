use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{errors::AppError, AppState};

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Guard for admin-only endpoints.
/// When no admin key is configured every request passes, otherwise the
/// `X-Admin-Key` header must match it. Returns 401 on mismatch.
/// Usage: Add `_admin: AdminAccess` as a parameter to your handler function.
#[derive(Debug)]
pub struct AdminAccess;

impl FromRequest for AdminAccess {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let expected = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.admin_api_key.clone());

        let Some(expected) = expected else {
            return ready(Ok(AdminAccess));
        };

        let provided = req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        match provided {
            Some(key) if key == expected => ready(Ok(AdminAccess)),
            _ => {
                tracing::warn!(path = %req.path(), "rejected admin request without a valid key");
                ready(Err(AppError::UnauthorizedAccess.into()))
            }
        }
    }
}
