//! Admin Account Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dashboard administrator account
///
/// 密码只存 argon2 哈希；登录走邮箱 OTP 两步验证。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub email: String,
    /// argon2id PHC string — never serialized to API responses
    pub password_hash: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_role() -> String {
    "admin".to_string()
}

fn default_true() -> bool {
    true
}

/// Public view of an admin (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            email: admin.email.clone(),
            name: admin.name.clone(),
            role: admin.role.clone(),
        }
    }
}
