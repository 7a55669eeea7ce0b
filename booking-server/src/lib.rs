//! Booking Server - 单店餐厅预订与桌台分配
//!
//! # 架构概述
//!
//! - **楼面** (`inventory`): 区域与桌台目录，启动时加载，只读
//! - **营业时间** (`calendar`): 每日可预订时段
//! - **预订账本** (`reservations`): redb 持久化，按 (桌台, 日期, 时段) 加锁
//! - **空位查询** (`reservations::availability`): MVCC 快照读，不加锁
//! - **通知** (`notify`): 提交后分发，失败只记日志
//! - **认证** (`auth`): JWT，员工 id 即状态变更的 actor
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── inventory/     # 区域、桌台、楼面文件
//! ├── calendar/      # 营业时段
//! ├── reservations/  # 账本、锁、状态机、空位查询
//! ├── notify/        # 事件分发
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod core;
pub mod inventory;
pub mod notify;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use reservations::{AvailabilityEngine, ReservationManager, ReservationStorage};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: .env、工作目录、日志
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| format!("{}/logs", work_dir));
    std::fs::create_dir_all(&log_dir)?;

    let level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON").ok().map(|v| v == "true" || v == "1");
    init_logger_with_file(level.as_deref(), json, Some(&log_dir));
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
