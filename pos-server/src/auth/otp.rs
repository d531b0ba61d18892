//! 管理员登录 OTP 存储
//!
//! 进程内 DashMap，重启即失效 — 单实例部署下可接受。
//! OTP 投递 (邮件) 由外部服务完成，这里只负责生成、校验和过期。

use dashmap::DashMap;
use shared::util::now_millis;
use thiserror::Error;

/// OTP 有效期 (毫秒)
const OTP_TTL_MILLIS: i64 = 5 * 60 * 1000;

/// 单个 OTP 最多允许的校验次数
const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("verification code has expired")]
    Expired,

    #[error("invalid verification code")]
    Invalid,

    #[error("too many attempts")]
    TooManyAttempts,

    #[error("no pending verification for this email")]
    NotFound,
}

#[derive(Debug)]
struct PendingOtp {
    code: String,
    issued_at: i64,
    attempts: u32,
}

/// 进程内 OTP 存储，按邮箱索引
#[derive(Debug, Default)]
pub struct OtpStore {
    pending: DashMap<String, PendingOtp>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// 为邮箱生成新的 6 位 OTP；覆盖旧的未使用 OTP
    pub fn issue(&self, email: &str) -> String {
        use rand::Rng;
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.pending.insert(
            email.to_lowercase(),
            PendingOtp {
                code: code.clone(),
                issued_at: now_millis(),
                attempts: 0,
            },
        );
        code
    }

    /// 校验并消费 OTP。
    ///
    /// 成功、过期、超次后条目都会被移除；只有"输错但还有机会"保留。
    pub fn verify(&self, email: &str, code: &str) -> Result<(), OtpError> {
        let key = email.to_lowercase();

        let mut entry = match self.pending.get_mut(&key) {
            Some(entry) => entry,
            None => return Err(OtpError::NotFound),
        };

        if now_millis() - entry.issued_at > OTP_TTL_MILLIS {
            drop(entry);
            self.pending.remove(&key);
            return Err(OtpError::Expired);
        }

        entry.attempts += 1;
        if entry.attempts > MAX_ATTEMPTS {
            drop(entry);
            self.pending.remove(&key);
            return Err(OtpError::TooManyAttempts);
        }

        if entry.code != code {
            return Err(OtpError::Invalid);
        }

        drop(entry);
        self.pending.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let store = OtpStore::new();
        let code = store.issue("Admin@Example.com");
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        // Lookup is case-insensitive, verify consumes the entry
        assert_eq!(store.verify("admin@example.com", &code), Ok(()));
        assert_eq!(
            store.verify("admin@example.com", &code),
            Err(OtpError::NotFound)
        );
    }

    #[test]
    fn test_wrong_code_keeps_entry_until_attempts_exhausted() {
        let store = OtpStore::new();
        let code = store.issue("a@b.c");
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_ATTEMPTS {
            assert_eq!(store.verify("a@b.c", wrong), Err(OtpError::Invalid));
        }
        // One more wrong attempt trips the cap and removes the entry
        assert_eq!(store.verify("a@b.c", wrong), Err(OtpError::TooManyAttempts));
        assert_eq!(store.verify("a@b.c", &code), Err(OtpError::NotFound));
    }

    #[test]
    fn test_reissue_replaces_previous_code() {
        let store = OtpStore::new();
        let first = store.issue("a@b.c");
        let second = store.issue("a@b.c");
        if first != second {
            assert_eq!(store.verify("a@b.c", &first), Err(OtpError::Invalid));
        }
        assert_eq!(store.verify("a@b.c", &second), Ok(()));
    }
}
