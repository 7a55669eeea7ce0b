//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`zones`] - 区域 (公开)
//! - [`tables`] - 桌台 (公开)
//! - [`availability`] - 空位查询 (公开)
//! - [`reservations`] - 预订 (创建公开，其余需员工权限)

pub mod availability;
pub mod health;
pub mod reservations;
pub mod tables;
pub mod zones;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
