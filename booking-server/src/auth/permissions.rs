//! Permission Definitions
//!
//! ## 设计原则
//! - 顾客侧操作（查看桌台、查询空位、提交预订）无需登录
//! - 员工查看预订需要 `reservations:view`
//! - 改变预订状态、删除预订需要 `reservations:manage`

/// 查看预订列表与详情
pub const RESERVATIONS_VIEW: &str = "reservations:view";

/// 确认 / 取消 / 重开 / 删除预订
pub const RESERVATIONS_MANAGE: &str = "reservations:manage";

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[RESERVATIONS_VIEW, RESERVATIONS_MANAGE];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &["all"];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 经理 / 领位员：完整预订管理
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[RESERVATIONS_VIEW, RESERVATIONS_MANAGE];

/// 普通员工：只读
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[RESERVATIONS_VIEW];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let perms = match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS,
        "manager" | "host" => DEFAULT_MANAGER_PERMISSIONS,
        "staff" => DEFAULT_STAFF_PERMISSIONS,
        _ => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_permissions() {
        assert_eq!(get_default_permissions("admin"), vec!["all"]);
        assert!(get_default_permissions("host").contains(&RESERVATIONS_MANAGE.to_string()));
        assert_eq!(get_default_permissions("staff"), vec![RESERVATIONS_VIEW]);
        assert!(get_default_permissions("guest").is_empty());
    }

    #[test]
    fn test_is_valid_permission() {
        assert!(is_valid_permission("reservations:manage"));
        assert!(is_valid_permission("reservations:*"));
        assert!(!is_valid_permission("orders:void"));
    }
}
