//! 租户会话注册表
//!
//! 锁的范围:
//! - 整个 map 由一把 `RwLock` 保护；只有创建、清除与过期清理需要写锁。
//! - 每个会话的数据由自己的 `Mutex` 保护，抽奖的读-改-写在这把锁内完成。
//! - 最后活动时间是条目上的原子时间戳，读锁下即可刷新。
//!
//! 加锁顺序固定为 store -> session，取得会话句柄后即释放 store 锁。

use crate::models::TenantId;
use crate::services::TenantSession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// 会话条目：活动时间 + 会话数据
#[derive(Debug)]
pub struct SessionEntry {
    last_activity_ms: AtomicI64,
    session: Mutex<TenantSession>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_activity_ms: AtomicI64::new(now.timestamp_millis()),
            session: Mutex::new(TenantSession::new()),
        }
    }

    /// 锁定会话数据。某次操作 panic 导致锁中毒时仍继续使用已有数据。
    pub fn lock(&self) -> MutexGuard<'_, TenantSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_activity_ms.load(Ordering::Acquire))
            .unwrap_or_default()
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_activity_ms
            .fetch_max(now.timestamp_millis(), Ordering::AcqRel);
    }

    fn is_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> bool {
        now - self.last_activity() > max_idle
    }
}

pub type SessionHandle = Arc<SessionEntry>;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<TenantId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得（必要时创建）租户会话，并刷新其最后活动时间
    pub fn get_or_create(&self, tenant_id: &TenantId) -> SessionHandle {
        self.get_or_create_at(tenant_id, Utc::now())
    }

    pub fn get_or_create_at(&self, tenant_id: &TenantId, now: DateTime<Utc>) -> SessionHandle {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = sessions.get(tenant_id) {
                entry.touch(now);
                return entry.clone();
            }
        }

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // 读锁释放后可能已被其它请求创建
        let entry = sessions.entry(tenant_id.clone()).or_insert_with(|| {
            log::info!("Created session for tenant: {tenant_id}");
            Arc::new(SessionEntry::new(now))
        });
        entry.touch(now);
        entry.clone()
    }

    /// 删除租户会话，返回会话是否存在
    pub fn clear(&self, tenant_id: &TenantId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(tenant_id)
            .is_some();
        if removed {
            log::info!("Cleared session for tenant: {tenant_id}");
        }
        removed
    }

    /// 删除超过 `max_idle` 未活动的会话，返回删除数量。
    ///
    /// 整个遍历过程持有写锁。
    pub fn sweep_inactive(&self, max_idle: Duration) -> usize {
        self.sweep_inactive_at(Utc::now(), max_idle)
    }

    pub fn sweep_inactive_at(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|tenant_id, entry| {
            let idle = entry.is_idle(now, max_idle);
            if idle {
                log::info!(
                    "Removing inactive session for tenant: {tenant_id}, last activity: {}",
                    entry.last_activity()
                );
            }
            !idle
        });
        before - sessions.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, tenant_id: &TenantId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(tenant_id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new();
        let tenant: TenantId = "t1".into();

        let first = store.get_or_create(&tenant);
        first.lock().add_participant("001", "Alice");

        let second = store.get_or_create(&tenant);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().participants().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tenants_are_isolated() {
        let store = SessionStore::new();
        let a: TenantId = "a".into();
        let b: TenantId = "b".into();

        store.get_or_create(&a).lock().add_prize("Grand", "TV", 1, false);

        assert!(store.get_or_create(&b).lock().prizes().is_empty());
        assert_eq!(store.get_or_create(&a).lock().prizes().len(), 1);
    }

    #[test]
    fn test_clear_removes_session() {
        let store = SessionStore::new();
        let tenant: TenantId = "t1".into();
        store.get_or_create(&tenant).lock().add_participant("001", "Alice");

        assert!(store.clear(&tenant));
        assert!(!store.contains(&tenant));
        assert!(!store.clear(&tenant));

        // 重新访问得到全新的空会话
        assert!(store.get_or_create(&tenant).lock().participants().is_empty());
    }

    #[test]
    fn test_sweep_removes_only_idle_sessions() {
        let store = SessionStore::new();
        let now = Utc::now();
        let stale: TenantId = "stale".into();
        let fresh: TenantId = "fresh".into();

        store.get_or_create_at(&stale, now - Duration::minutes(61));
        store.get_or_create_at(&fresh, now - Duration::minutes(5));

        let removed = store.sweep_inactive_at(now, Duration::hours(1));

        assert_eq!(removed, 1);
        assert!(!store.contains(&stale));
        assert!(store.contains(&fresh));
    }

    #[test]
    fn test_access_refreshes_activity() {
        let store = SessionStore::new();
        let now = Utc::now();
        let tenant: TenantId = "t1".into();

        store.get_or_create_at(&tenant, now - Duration::minutes(90));
        let entry = store.get_or_create_at(&tenant, now - Duration::minutes(1));
        assert_eq!(
            entry.last_activity().timestamp_millis(),
            (now - Duration::minutes(1)).timestamp_millis()
        );

        assert_eq!(store.sweep_inactive_at(now, Duration::hours(1)), 0);
        assert!(store.contains(&tenant));
    }

    #[test]
    fn test_concurrent_get_or_create_yields_single_session() {
        let store = Arc::new(SessionStore::new());
        let tenant: TenantId = "shared".into();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let tenant = tenant.clone();
                std::thread::spawn(move || {
                    store
                        .get_or_create(&tenant)
                        .lock()
                        .add_participant(format!("{i:03}"), format!("P{i}"));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_or_create(&tenant).lock().participants().len(), 8);
    }
}
