//! 统一错误处理
//!
//! HTTP 层统一使用 `shared::error` 的错误体系：
//!
//! | 类型 | 说明 |
//! |------|------|
//! | [`AppError`] | 错误码 + 消息 + 结构化 details，实现 `IntoResponse` |
//! | [`ErrorBody`] | 错误响应体 `{ code, message, details }` |
//! | [`ErrorCode`] | u16 错误码，按千位分类 |
//!
//! 账本的 `ReservationError` 通过 `From` 转换为 [`AppError`]，
//! 成功响应直接返回 `Json(T)`。

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
