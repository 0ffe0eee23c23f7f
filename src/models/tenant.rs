use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// 租户ID: `{租户名}-{客户端IP}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// 组合租户名与IP；没有租户名（或为空）时使用 `user-{ip}`
    pub fn resolve(tenant_name: Option<&str>, client_ip: &str) -> Self {
        let name = tenant_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_tenant_name(client_ip));
        Self(format!("{name}-{client_ip}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn default_tenant_name(client_ip: &str) -> String {
    format!("user-{client_ip}")
}

/// 设置租户名请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetTenantRequest {
    pub tenant_name: String,
}

/// 当前租户信息
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    /// cookie 中的租户名（未设置时为 None）
    pub tenant_name: Option<String>,
    pub tenant_id: TenantId,
}
