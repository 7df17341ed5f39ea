use axum::{
    extract::{FromRef, Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{
    ForgotPasswordRequest, LoginRequest, PublicAccount, RegisterRequest, ResetPasswordRequest,
    SessionPayload, UpdatePasswordRequest, UpdateProfileRequest, UpdateRoleRequest, UserPayload,
    UsersPayload,
};
use super::model::{digest_reset_token, Account};
use crate::auth::extractors::{AdminAccount, CurrentAccount};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{cleared_session_cookie, session_cookie, TokenKeys};
use crate::response::{ok, ok_message, parse_id, ApiError, ApiResult, Empty, Envelope};
use crate::state::AppState;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Signs a session token for the account and sets it as an HTTP-only cookie
/// alongside the success envelope.
fn send_session(
    state: &AppState,
    jar: CookieJar,
    account: Account,
    message: &str,
) -> ApiResult<(CookieJar, Json<Envelope<SessionPayload>>)> {
    let keys = TokenKeys::from_ref(state);
    let token = keys.sign(account.object_id()?)?;
    let jar = jar.add(session_cookie(token.clone(), state.config.cookie_ttl_days));
    Ok((
        jar,
        ok(
            message,
            SessionPayload {
                user: PublicAccount::from(account),
                token,
            },
        ),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<SessionPayload>>)> {
    let email = payload.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::fail("Please Enter valid email"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::fail("Password should be more than 8 characters"));
    }
    if Account::find_by_email(&state.store, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::fail("User already Exist"));
    }

    let hash = hash_password(&payload.password)?;
    let mut account = Account::new(payload.name.trim(), &email, hash);
    Account::insert(&state.store, &mut account).await?;

    info!(email = %account.email, "account registered");
    send_session(&state, jar, account, "User registered successfully")
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<SessionPayload>>)> {
    let (Some(email), Some(password)) = (
        payload.email.filter(|e| !e.is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::fail("Please enter Email or password"));
    };
    let email = email.trim().to_lowercase();

    // Unknown email and wrong password get the same answer.
    let Some(account) = Account::find_by_email(&state.store, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::fail("Invalid Email or Password"));
    };
    if !verify_password(&password, &account.password)? {
        warn!(email = %email, "login invalid password");
        return Err(ApiError::fail("Invalid Email or Password"));
    }

    info!(email = %account.email, "account logged in");
    send_session(&state, jar, account, "User logged in Successfully")
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Envelope<Empty>>) {
    (
        jar.add(cleared_session_cookie()),
        ok_message("Logged out successfully"),
    )
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let email = payload.email.trim().to_lowercase();
    let Some(mut account) = Account::find_by_email(&state.store, &email).await? else {
        return Err(ApiError::fail("user not found"));
    };

    let token = account.issue_reset_token();
    Account::save(&state.store, &account).await?;

    let reset_url = format!(
        "{}/api/v1/password/reset/{}",
        state.config.public_url.trim_end_matches('/'),
        token
    );
    let body = format!(
        "Your password reset token is :- \n\n {reset_url} \n\n \
         If you have not requested this email then, please ignore it"
    );

    match state
        .mailer
        .send(&account.email, "ShopSpot Password Recovery", &body)
        .await
    {
        Ok(()) => {
            info!(email = %account.email, "password recovery email sent");
            Ok(ok_message(format!(
                "Email sent to {} successfully",
                account.email
            )))
        }
        Err(err) => {
            // Drop the stored token so the next attempt starts clean.
            account.clear_reset_token();
            Account::save(&state.store, &account).await?;
            warn!(email = %account.email, error = %err, "password recovery email failed");
            Err(ApiError::fail(err.to_string()))
        }
    }
}

#[instrument(skip(state, jar, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<SessionPayload>>)> {
    let digest = digest_reset_token(&token);
    let Some(mut account) = Account::find_by_reset_digest(&state.store, &digest).await? else {
        return Err(ApiError::fail(
            "Reset password token is invalid or has been expired",
        ));
    };
    if payload.password != payload.confirm_password {
        return Err(ApiError::fail("Password does not matched"));
    }

    account.password = hash_password(&payload.password)?;
    account.clear_reset_token();
    Account::save(&state.store, &account).await?;

    info!(email = %account.email, "password reset");
    send_session(
        &state,
        jar,
        account,
        "Password is changed and user Logged in successfully",
    )
}

#[instrument(skip_all)]
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<Envelope<UserPayload>> {
    ok(
        "User found",
        UserPayload {
            user: PublicAccount::from(account),
        },
    )
}

#[instrument(skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    jar: CookieJar,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<SessionPayload>>)> {
    if !verify_password(&payload.old_password, &account.password)? {
        return Err(ApiError::fail("Old password is Incorrect"));
    }
    if payload.new_password != payload.confirm_password {
        return Err(ApiError::fail(
            "new password and confirm password not matched",
        ));
    }

    account.password = hash_password(&payload.new_password)?;
    Account::save(&state.store, &account).await?;

    send_session(
        &state,
        jar,
        account,
        "Password changed and user Logged in successfully",
    )
}

#[instrument(skip(state, account, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = account.object_id()?;
    if Account::update_profile(&state.store, id, payload.name.trim(), &payload.email)
        .await?
        .is_none()
    {
        return Err(ApiError::fail("User not found"));
    }
    Ok(ok_message("User Profile updated successfully"))
}

#[instrument(skip_all)]
pub async fn admin_list_users(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
) -> ApiResult<Json<Envelope<UsersPayload>>> {
    let users = Account::list(&state.store)
        .await?
        .into_iter()
        .map(PublicAccount::from)
        .collect();
    Ok(ok(
        "Users fetched successfully",
        UsersPayload { users },
    ))
}

#[instrument(skip(state))]
pub async fn admin_get_user(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserPayload>>> {
    let id = parse_id(&id, "User not found")?;
    let Some(account) = Account::find_by_id(&state.store, id).await? else {
        return Err(ApiError::fail("User not found"));
    };
    Ok(ok(
        "User fetched successfully",
        UserPayload {
            user: PublicAccount::from(account),
        },
    ))
}

#[instrument(skip(state, payload))]
pub async fn admin_update_role(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id, "User not found")?;
    if Account::update_role(
        &state.store,
        id,
        payload.name.trim(),
        &payload.email,
        payload.role,
    )
    .await?
    .is_none()
    {
        return Err(ApiError::fail("User not found"));
    }
    Ok(ok_message(format!("User role changed to {}", payload.role)))
}

#[instrument(skip(state))]
pub async fn admin_delete_user(
    State(state): State<AppState>,
    AdminAccount(_): AdminAccount,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id, "User not found")?;
    if !Account::delete(&state.store, id).await? {
        return Err(ApiError::fail("User not found"));
    }
    info!(account_id = %id, "account deleted");
    Ok(ok_message("User deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
    }
}
