//! 错误分类 (按错误码千位)

use super::codes::ErrorCode;

/// Who an error is about, derived from the thousands digit of its code
///
/// | Range | Category |
/// |-------|----------|
/// | 1xxx | Auth |
/// | 2xxx | Permission |
/// | 4xxx | Reservation |
/// | 7xxx | Floor (tables, zones) |
/// | ≥ 9000 | System |
/// | otherwise | Request |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or invalid request
    Request,
    Auth,
    Permission,
    /// Ledger rejections
    Reservation,
    /// Floor plan lookups and fit
    Floor,
    /// Server-side failure; the client did nothing wrong
    System,
}

impl ErrorCategory {
    pub fn of(code: u16) -> Self {
        match code / 1000 {
            1 => Self::Auth,
            2 => Self::Permission,
            4 => Self::Reservation,
            7 => Self::Floor,
            9.. => Self::System,
            _ => Self::Request,
        }
    }

    /// Caller-side outcome (4xx) as opposed to a server fault
    pub fn is_client_side(&self) -> bool {
        !matches!(self, Self::System)
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::of(self.code())
    }
}
