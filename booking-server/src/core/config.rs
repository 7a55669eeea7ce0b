use std::path::PathBuf;

use chrono_tz::Tz;

use crate::auth::{JwtConfig, JwtError};
use crate::reservations::BookingPolicy;
use crate::utils::time::parse_timezone;

/// 服务器配置 - 预订服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | FLOOR_PLAN_PATH | {WORK_DIR}/floor_plan.json | 区域/桌台/营业时间 |
/// | BUSINESS_TIMEZONE | Europe/Madrid | 判断"今天"的时区 |
/// | MAX_PARTY_SIZE | 12 | 单笔预订最大人数 |
/// | BOOKING_HORIZON_DAYS | 90 | 最远可预订天数 |
/// | NOTIFY_WEBHOOK_URL | (无) | 预订事件 Webhook |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/booking HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 楼面配置文件路径 (None = {work_dir}/floor_plan.json)
    pub floor_plan_path: Option<String>,
    /// 业务时区
    pub timezone: Tz,
    /// 预订限制
    pub policy: BookingPolicy,
    /// 预订事件 Webhook 地址
    pub notify_webhook_url: Option<String>,
    /// 最大并发请求数
    pub max_connections: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的环境变量使用默认值；只有 JWT 密钥在生产环境下缺失会报错。
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "production")?;

        let timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) => parse_timezone(&name).unwrap_or_else(|| {
                tracing::warn!(timezone = %name, "Unknown BUSINESS_TIMEZONE, using Europe/Madrid");
                chrono_tz::Europe::Madrid
            }),
            Err(_) => chrono_tz::Europe::Madrid,
        };

        let defaults = BookingPolicy::default();
        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            jwt,
            environment,
            floor_plan_path: std::env::var("FLOOR_PLAN_PATH").ok(),
            timezone,
            policy: BookingPolicy {
                max_party_size: env_parse("MAX_PARTY_SIZE").unwrap_or(defaults.max_party_size),
                horizon_days: env_parse("BOOKING_HORIZON_DAYS").unwrap_or(defaults.horizon_days),
            },
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            max_connections: env_parse("MAX_CONNECTIONS").unwrap_or(1000),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30000),
        })
    }

    /// 不读环境变量的配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16, jwt: JwtConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            jwt,
            environment: "development".into(),
            floor_plan_path: None,
            timezone: chrono_tz::Europe::Madrid,
            policy: BookingPolicy::default(),
            notify_webhook_url: None,
            max_connections: 1000,
            request_timeout_ms: 30000,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录: {work_dir}/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件: {work_dir}/database/reservations.redb
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("reservations.redb")
    }

    /// 日志目录: {work_dir}/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 楼面配置文件路径
    pub fn floor_plan_path(&self) -> PathBuf {
        match &self.floor_plan_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("floor_plan.json"),
        }
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
