use crate::config::SessionConfig;
use crate::error::DrawError;
use crate::models::{DrawResult, LotteryOverview, Participant, Prize, TenantId};
use crate::services::{DrawEngine, SessionHandle, SessionStore};
use chrono::Duration;
use std::sync::Arc;

/// 多租户抽奖服务：会话注册表 + 抽奖引擎
///
/// 可廉价 clone，供 actix 各 worker 共享。
#[derive(Clone)]
pub struct LotteryService {
    store: Arc<SessionStore>,
    engine: Arc<DrawEngine>,
    max_idle: Duration,
}

impl LotteryService {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_engine(config, DrawEngine::new())
    }

    pub fn with_engine(config: &SessionConfig, engine: DrawEngine) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            engine: Arc::new(engine),
            max_idle: config.max_idle(),
        }
    }

    /// 取得租户会话（不存在则创建），同时刷新活动时间
    pub fn get_session(&self, tenant_id: &TenantId) -> SessionHandle {
        self.store.get_or_create(tenant_id)
    }

    pub fn get_prizes(&self, tenant_id: &TenantId) -> Vec<Prize> {
        self.get_session(tenant_id).lock().prizes().to_vec()
    }

    pub fn get_participants(&self, tenant_id: &TenantId) -> Vec<Participant> {
        self.get_session(tenant_id).lock().participants().to_vec()
    }

    pub fn get_results(&self, tenant_id: &TenantId) -> Vec<DrawResult> {
        self.get_session(tenant_id).lock().results().to_vec()
    }

    /// 奖项、参与者与结果在同一次加锁内读取，互相一致
    pub fn get_overview(&self, tenant_id: &TenantId) -> LotteryOverview {
        let session = self.get_session(tenant_id);
        let guard = session.lock();
        LotteryOverview {
            prizes: guard.prizes().to_vec(),
            participants: guard.participants().to_vec(),
            results: guard.results().to_vec(),
        }
    }

    pub fn add_prize(
        &self,
        tenant_id: &TenantId,
        name: &str,
        item: &str,
        quantity: u32,
        draw_from_all: bool,
    ) {
        self.get_session(tenant_id)
            .lock()
            .add_prize(name, item, quantity, draw_from_all);
    }

    /// 新增参与者；重复ID静默忽略
    pub fn add_participant(&self, tenant_id: &TenantId, id: &str, name: &str) -> bool {
        self.get_session(tenant_id).lock().add_participant(id, name)
    }

    pub fn get_eligible_participants(
        &self,
        tenant_id: &TenantId,
        prize_name: &str,
    ) -> Result<Vec<Participant>, DrawError> {
        let session = self.get_session(tenant_id);
        let guard = session.lock();
        DrawEngine::eligible_participants(&guard, prize_name)
            .map(|list| list.into_iter().cloned().collect())
    }

    /// 抽奖；整个读-改-写过程持有该租户的会话锁
    pub fn draw(&self, tenant_id: &TenantId, prize_name: &str) -> Result<DrawResult, DrawError> {
        let session = self.get_session(tenant_id);
        let mut guard = session.lock();
        let result = self.engine.draw(&mut guard, prize_name)?;
        log::info!(
            "Tenant {tenant_id} drew {} ({}) -> {} ({})",
            result.prize_name,
            result.prize_item,
            result.winner_name,
            result.winner_id
        );
        Ok(result)
    }

    pub fn clear_session(&self, tenant_id: &TenantId) -> bool {
        self.store.clear(tenant_id)
    }

    /// 清理闲置超过 `max_idle` 的会话
    pub fn sweep_inactive(&self) -> usize {
        self.store.sweep_inactive(self.max_idle)
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &SessionStore {
        &self.store
    }
}
