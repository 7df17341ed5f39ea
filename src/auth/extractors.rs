use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;
use tracing::warn;

use crate::accounts::model::{Account, Role};
use crate::auth::token::{TokenKeys, SESSION_COOKIE};
use crate::response::ApiError;
use crate::state::AppState;

/// Resolves the session cookie to the calling account and makes it the
/// request context for the handler.
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(ApiError::Unauthenticated)?;

        let keys = TokenKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Unauthenticated
        })?;

        let id = ObjectId::parse_str(&claims.sub).map_err(|_| ApiError::Unauthenticated)?;
        let account = Account::find_by_id(&state.store, id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(CurrentAccount(account))
    }
}

/// Role gate for admin routes. Rejection halts the request.
pub struct AdminAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for AdminAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;
        if account.role != Role::Admin {
            warn!(account = %account.email, "admin route denied");
            return Err(ApiError::Forbidden);
        }
        Ok(AdminAccount(account))
    }
}
