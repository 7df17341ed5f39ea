use anyhow::Context;
use mongodb::bson::{oid::ObjectId, DateTime};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Reset tokens are valid for 15 minutes.
const RESET_TOKEN_TTL_MS: i64 = 15 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub public_id: String,
    pub url: String,
}

impl Avatar {
    /// Placeholder reference until a real upload flow replaces it.
    pub fn placeholder() -> Self {
        Self {
            public_id: "default_avatar".into(),
            url: "/images/default_avatar.png".into(),
        }
    }
}

/// Account document in the `users` collection. The `password` field holds the
/// argon2 hash and is only ever exposed through [`PublicAccount`]-shaped DTOs,
/// never serialized into a response directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Avatar,
    #[serde(default)]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_expire: Option<DateTime>,
}

impl Account {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password_hash,
            avatar: Avatar::placeholder(),
            role: Role::default(),
            reset_password_token: None,
            reset_password_expire: None,
        }
    }

    pub fn object_id(&self) -> anyhow::Result<ObjectId> {
        self.id.context("account has no id")
    }

    /// Generates a fresh reset token, storing only its digest plus expiry.
    /// Returns the plaintext token for the reset link.
    pub fn issue_reset_token(&mut self) -> String {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.reset_password_token = Some(digest_reset_token(&token));
        self.reset_password_expire = Some(DateTime::from_millis(
            DateTime::now().timestamp_millis() + RESET_TOKEN_TTL_MS,
        ));
        token
    }

    /// Cleared after a successful reset, or when the recovery email fails so
    /// a retry can issue a new token.
    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }
}

pub fn digest_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("Ada", "ada@example.com", "hash".into())
    }

    #[test]
    fn new_account_defaults() {
        let account = account();
        assert_eq!(account.role, Role::User);
        assert!(account.reset_password_token.is_none());
        assert!(account.reset_password_expire.is_none());
    }

    #[test]
    fn issue_reset_token_stores_digest_not_plaintext() {
        let mut account = account();
        let token = account.issue_reset_token();
        assert_eq!(token.len(), 40); // 20 random bytes, hex encoded
        let stored = account.reset_password_token.as_deref().unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, digest_reset_token(&token));
    }

    #[test]
    fn issue_reset_token_expiry_is_fifteen_minutes_out() {
        let mut account = account();
        account.issue_reset_token();
        let expiry = account.reset_password_expire.unwrap().timestamp_millis();
        let delta = expiry - DateTime::now().timestamp_millis();
        assert!(delta > 14 * 60 * 1000 && delta <= 15 * 60 * 1000);
    }

    #[test]
    fn clear_reset_token_wipes_both_fields() {
        let mut account = account();
        account.issue_reset_token();
        account.clear_reset_token();
        assert!(account.reset_password_token.is_none());
        assert!(account.reset_password_expire.is_none());
    }

    #[test]
    fn reissue_invalidates_previous_token() {
        let mut account = account();
        let first = account.issue_reset_token();
        let second = account.issue_reset_token();
        let stored = account.reset_password_token.as_deref().unwrap();
        assert_ne!(stored, digest_reset_token(&first));
        assert_eq!(stored, digest_reset_token(&second));
    }

    #[test]
    fn account_document_never_serializes_missing_reset_fields() {
        let doc = mongodb::bson::to_document(&account()).unwrap();
        assert!(!doc.contains_key("resetPasswordToken"));
        assert!(!doc.contains_key("resetPasswordExpire"));
        assert_eq!(doc.get_str("role").unwrap(), "user");
    }
}
