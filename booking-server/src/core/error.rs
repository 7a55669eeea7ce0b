use thiserror::Error;

use crate::auth::JwtError;
use crate::inventory::FloorPlanError;
use crate::reservations::ReservationError;

/// 启动与运行期错误 (非请求级)
///
/// 请求级错误统一走 [`AppError`](crate::AppError)。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] JwtError),

    #[error("楼面配置错误: {0}")]
    FloorPlan(#[from] FloorPlanError),

    #[error("预订存储初始化失败: {0}")]
    Storage(#[from] ReservationError),

    #[error("Webhook 客户端初始化失败: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
