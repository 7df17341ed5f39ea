use serde::{Deserialize, Serialize};

use super::model::{Account, Avatar, Role};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Both fields optional so presence is checked in the handler, producing the
/// envelope failure instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Public part of an account returned to clients; the password hash and reset
/// fields never leave the server.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Avatar,
    pub role: Role,
}

impl From<Account> for PublicAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: account.name,
            email: account.email,
            avatar: account.avatar,
            role: account.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: PublicAccount,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: PublicAccount,
}

#[derive(Debug, Serialize)]
pub struct UsersPayload {
    pub users: Vec<PublicAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_account_excludes_password_hash() {
        let mut account = Account::new("Ada", "ada@example.com", "secret-hash".into());
        account.id = Some(mongodb::bson::oid::ObjectId::new());
        let json = serde_json::to_string(&PublicAccount::from(account)).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
    }
}
