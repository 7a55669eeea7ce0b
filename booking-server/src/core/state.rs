use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::inventory::{FloorPlan, InventoryRegistry};
use crate::notify::{LogDispatcher, WebhookDispatcher};
use crate::reservations::{AvailabilityEngine, ReservationManager};
use crate::utils::{Clock, SystemClock};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一次的成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | inventory | Arc<InventoryRegistry> | 区域与桌台 (只读) |
/// | reservations | Arc<ReservationManager> | 预订账本 (唯一写入方) |
/// | availability | AvailabilityEngine | 空位查询 (快照读) |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 区域与桌台
    pub inventory: Arc<InventoryRegistry>,
    /// 预订账本
    pub reservations: Arc<ReservationManager>,
    /// 空位查询
    pub availability: AvailabilityEngine,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态 (系统时钟，业务时区取自配置)
    pub fn initialize(config: &Config) -> Result<Self> {
        Self::initialize_with_clock(config, Arc::new(SystemClock::new(config.timezone)))
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 楼面配置 (区域、桌台、营业时间)
    /// 3. 预订账本 (work_dir/database/reservations.redb)
    /// 4. 通知分发 (日志、Webhook)
    pub fn initialize_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        // 1. Work dir
        config.ensure_work_dir_structure()?;

        // 2. Floor plan
        let (inventory, calendar) = FloorPlan::load_or_default(config.floor_plan_path())?.build()?;
        let inventory = Arc::new(inventory);
        let calendar = Arc::new(calendar);
        tracing::info!(
            zones = inventory.list_zones().len(),
            tables = inventory.table_count(),
            slot_interval_minutes = calendar.interval_minutes(),
            "Inventory ready"
        );

        // 3. Ledger
        let db_path = config.database_path();
        let mut manager = ReservationManager::new(
            &db_path,
            inventory.clone(),
            calendar,
            clock,
            config.policy,
        )?;
        tracing::info!(path = %db_path.display(), "Reservation ledger opened");

        // 4. Dispatchers
        manager.add_dispatcher(Arc::new(LogDispatcher));
        if let Some(url) = &config.notify_webhook_url {
            let webhook =
                WebhookDispatcher::new(url.clone(), Duration::from_millis(config.request_timeout_ms))?;
            manager.add_dispatcher(Arc::new(webhook));
        }

        let availability = manager.availability();
        Ok(Self {
            config: config.clone(),
            inventory,
            reservations: Arc::new(manager),
            availability,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
        })
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
