//! Admin Auth Handlers
//!
//! 邮箱 OTP 两步登录。OTP 的邮件投递由外部服务完成，这里只生成并
//! 记录到 security 日志通道；开发环境下方便联调，生产环境接入投递
//! 服务后该日志应降级。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{OtpError, verify_password};
use crate::core::ServerState;
use crate::db::models::AdminProfile;
use crate::db::repository::AdminRepository;
use crate::security_log;
use crate::utils::validation::{MAX_EMAIL_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Login response: OTP dispatched
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
}

/// OTP verification request body
#[derive(Debug, Deserialize)]
pub struct VerifyOtpPayload {
    pub email: String,
    pub otp: String,
}

/// OTP verification response: the bearer token
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub token: String,
    pub admin: AdminProfile,
}

/// POST /api/admin/login - 第一步：密码校验 + 发送 OTP
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.password, "password", 128)?;

    let repo = AdminRepository::new(state.db.clone());
    let admin = repo.find_by_email(&payload.email).await?;

    // 统一错误，避免枚举邮箱
    let admin = match admin {
        Some(a) if a.is_active && verify_password(&payload.password, &a.password_hash) => a,
        _ => {
            security_log!("WARN", "admin_login_failed", email = payload.email.as_str());
            return Err(AppError::invalid_credentials());
        }
    };

    let otp = state.otp_store.issue(&admin.email);
    security_log!(
        "INFO",
        "admin_otp_issued",
        email = admin.email.as_str(),
        otp = otp.as_str()
    );

    Ok(Json(LoginResponse {
        message: "verification code sent",
    }))
}

/// POST /api/admin/verify-otp - 第二步：校验 OTP 并签发 JWT
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> AppResult<Json<VerifyOtpResponse>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.otp, "otp", 16)?;

    state
        .otp_store
        .verify(&payload.email, &payload.otp)
        .map_err(|e| match e {
            OtpError::Expired => AppError::new(ErrorCode::OtpExpired),
            OtpError::TooManyAttempts => AppError::new(ErrorCode::TooManyAttempts),
            OtpError::Invalid | OtpError::NotFound => AppError::new(ErrorCode::OtpInvalid),
        })?;

    let repo = AdminRepository::new(state.db.clone());
    let admin = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let admin_id = admin
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| admin.email.clone());
    let token = state
        .jwt_service
        .generate_token(&admin_id, &admin.email, &admin.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    security_log!("INFO", "admin_login_success", email = admin.email.as_str());

    Ok(Json(VerifyOtpResponse {
        token,
        admin: AdminProfile::from(&admin),
    }))
}
