//! Unified error codes for the Saffron POS platform
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table / reservation errors
//! - 8xxx: Session / delivery errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// One-time passcode has expired
    OtpExpired = 1005,
    /// One-time passcode is invalid
    OtpInvalid = 1006,
    /// Too many verification attempts
    TooManyAttempts = 1007,
    /// Account is disabled
    AccountDisabled = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Administrator role required
    AdminRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Client-declared total does not match the server-computed total
    OrderTotalMismatch = 4002,
    /// Order has already been paid
    OrderAlreadyPaid = 4003,
    /// Order has no items
    OrderEmpty = 4004,
    /// Order status transition is not allowed
    OrderStatusInvalid = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment processing failed
    PaymentFailed = 5002,
    /// Payment request not found
    PaymentRequestNotFound = 5101,
    /// Payment request is stale (nothing left to pay)
    PaymentRequestStale = 5102,
    /// Gateway order not found
    GatewayOrderNotFound = 5201,
    /// Gateway payment signature verification failed
    GatewaySignatureInvalid = 5202,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is currently unavailable
    MenuItemUnavailable = 6002,
    /// Menu item id already exists
    MenuItemIdExists = 6003,
    /// Menu item has an invalid price
    MenuItemInvalidPrice = 6004,

    // ==================== 7xxx: Table / Reservation ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied by another customer
    TableOccupied = 7002,
    /// Table number already exists
    TableNumberExists = 7003,
    /// Table has an upcoming reservation inside the seating window
    TableReservedSoon = 7004,
    /// Table has a cleaning activity in progress
    TableCleaningInProgress = 7005,
    /// Table activity not found
    ActivityNotFound = 7006,
    /// Table activity has already been closed
    ActivityAlreadyClosed = 7007,
    /// Reservation not found
    ReservationNotFound = 7101,
    /// Reservation conflicts with an existing booking or live seating
    ReservationConflict = 7102,
    /// Reservation date/time is malformed or in the past
    ReservationBadTime = 7103,
    /// Reservation status transition is not allowed
    ReservationStatusInvalid = 7104,

    // ==================== 8xxx: Session / Delivery ====================
    /// Session not found
    SessionNotFound = 8001,
    /// Session has already ended
    SessionEnded = 8002,
    /// Delivery not found
    DeliveryNotFound = 8101,
    /// Linked order must be served before dispatching the delivery
    DeliveryOrderNotServed = 8102,
    /// Delivery status transition is not allowed
    DeliveryStatusInvalid = 8103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::OtpExpired => "Verification code has expired",
            ErrorCode::OtpInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderTotalMismatch => "total price is changed",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderStatusInvalid => "Order status transition is not allowed",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentRequestNotFound => "Payment request not found",
            ErrorCode::PaymentRequestStale => "Payment request has nothing left to pay",
            ErrorCode::GatewayOrderNotFound => "Gateway order not found",
            ErrorCode::GatewaySignatureInvalid => "Payment signature verification failed",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is currently unavailable",
            ErrorCode::MenuItemIdExists => "Menu item id already exists",
            ErrorCode::MenuItemInvalidPrice => "Menu item has an invalid price",

            // Table / Reservation
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied by another customer",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::TableReservedSoon => "Table is reserved within the seating window",
            ErrorCode::TableCleaningInProgress => "Table has a cleaning activity in progress",
            ErrorCode::ActivityNotFound => "Table activity not found",
            ErrorCode::ActivityAlreadyClosed => "Table activity has already been closed",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationConflict => "Reservation conflicts with an existing booking",
            ErrorCode::ReservationBadTime => "Reservation date or time is invalid",
            ErrorCode::ReservationStatusInvalid => {
                "Reservation status transition is not allowed"
            }

            // Session / Delivery
            ErrorCode::SessionNotFound => "Session not found",
            ErrorCode::SessionEnded => "Session has already ended",
            ErrorCode::DeliveryNotFound => "Delivery not found",
            ErrorCode::DeliveryOrderNotServed => {
                "Linked order must be served before dispatching"
            }
            ErrorCode::DeliveryStatusInvalid => "Delivery status transition is not allowed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::OtpExpired),
            1006 => Ok(ErrorCode::OtpInvalid),
            1007 => Ok(ErrorCode::TooManyAttempts),
            1008 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderTotalMismatch),
            4003 => Ok(ErrorCode::OrderAlreadyPaid),
            4004 => Ok(ErrorCode::OrderEmpty),
            4005 => Ok(ErrorCode::OrderStatusInvalid),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentFailed),
            5101 => Ok(ErrorCode::PaymentRequestNotFound),
            5102 => Ok(ErrorCode::PaymentRequestStale),
            5201 => Ok(ErrorCode::GatewayOrderNotFound),
            5202 => Ok(ErrorCode::GatewaySignatureInvalid),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),
            6003 => Ok(ErrorCode::MenuItemIdExists),
            6004 => Ok(ErrorCode::MenuItemInvalidPrice),

            // Table / Reservation
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableNumberExists),
            7004 => Ok(ErrorCode::TableReservedSoon),
            7005 => Ok(ErrorCode::TableCleaningInProgress),
            7006 => Ok(ErrorCode::ActivityNotFound),
            7007 => Ok(ErrorCode::ActivityAlreadyClosed),
            7101 => Ok(ErrorCode::ReservationNotFound),
            7102 => Ok(ErrorCode::ReservationConflict),
            7103 => Ok(ErrorCode::ReservationBadTime),
            7104 => Ok(ErrorCode::ReservationStatusInvalid),

            // Session / Delivery
            8001 => Ok(ErrorCode::SessionNotFound),
            8002 => Ok(ErrorCode::SessionEnded),
            8101 => Ok(ErrorCode::DeliveryNotFound),
            8102 => Ok(ErrorCode::DeliveryOrderNotServed),
            8103 => Ok(ErrorCode::DeliveryStatusInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OtpInvalid.code(), 1006);

        assert_eq!(ErrorCode::OrderTotalMismatch.code(), 4002);
        assert_eq!(ErrorCode::PaymentRequestStale.code(), 5102);
        assert_eq!(ErrorCode::GatewaySignatureInvalid.code(), 5202);
        assert_eq!(ErrorCode::MenuItemUnavailable.code(), 6002);
        assert_eq!(ErrorCode::TableReservedSoon.code(), 7004);
        assert_eq!(ErrorCode::ReservationConflict.code(), 7102);
        assert_eq!(ErrorCode::DeliveryOrderNotServed.code(), 8102);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::OtpExpired,
            ErrorCode::OrderTotalMismatch,
            ErrorCode::TableOccupied,
            ErrorCode::ReservationConflict,
            ErrorCode::DeliveryStatusInvalid,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::TableOccupied).unwrap();
        assert_eq!(json, "7002");

        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::OrderTotalMismatch);
    }
}
