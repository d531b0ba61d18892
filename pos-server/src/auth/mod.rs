//! 认证模块 - 管理员邮箱 OTP 两步登录 + JWT
//!
//! # 流程
//!
//! 1. `POST /api/admin/login` 校验邮箱/密码 (argon2)，生成 6 位 OTP
//!    存入进程内 [`OtpStore`]，投递由外部邮件服务完成 (不在本仓库范围)
//! 2. `POST /api/admin/verify-otp` 校验 OTP，签发 JWT
//! 3. 受保护的路由通过 [`CurrentAdmin`] extractor 校验 Bearer token

pub mod extractor;
pub mod jwt;
pub mod otp;

pub use jwt::{Claims, CurrentAdmin, JwtConfig, JwtError, JwtService};
pub use otp::{OtpError, OtpStore};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

/// Hash a password with argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("s3cret-pass").expect("hashing failed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
