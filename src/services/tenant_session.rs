use crate::models::{DrawResult, Participant, Prize};
use std::collections::{HashMap, HashSet};

/// 单个租户的全部抽奖状态
///
/// 本身不做同步，由 `SessionStore` 以每个会话一把 `Mutex` 保护。
#[derive(Debug, Default, Clone)]
pub struct TenantSession {
    prizes: Vec<Prize>,
    participants: Vec<Participant>,
    // 参与者ID -> 已中奖项名称
    wins: HashMap<String, HashSet<String>>,
    results: Vec<DrawResult>,
}

impl TenantSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增奖项；不检查名称是否重复
    pub fn add_prize(
        &mut self,
        name: impl Into<String>,
        item: impl Into<String>,
        quantity: u32,
        draw_from_all: bool,
    ) {
        self.prizes
            .push(Prize::new(name, item, quantity, draw_from_all));
    }

    /// 新增参与者；ID 已存在时忽略（先写入者为准），返回是否实际新增
    pub fn add_participant(&mut self, id: impl Into<String>, name: impl Into<String>) -> bool {
        let id = id.into();
        if self.participants.iter().any(|p| p.id == id) {
            return false;
        }
        self.participants.push(Participant::new(id, name));
        true
    }

    pub fn record_win(&mut self, participant_id: impl Into<String>, prize_name: impl Into<String>) {
        self.wins
            .entry(participant_id.into())
            .or_default()
            .insert(prize_name.into());
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn results(&self) -> &[DrawResult] {
        &self.results
    }

    /// 某参与者已中过的奖项
    pub fn wins_of(&self, participant_id: &str) -> Option<&HashSet<String>> {
        self.wins.get(participant_id)
    }

    pub fn has_any_win(&self, participant_id: &str) -> bool {
        self.wins_of(participant_id).is_some_and(|w| !w.is_empty())
    }

    pub fn has_won(&self, participant_id: &str, prize_name: &str) -> bool {
        self.wins_of(participant_id)
            .is_some_and(|w| w.contains(prize_name))
    }

    /// 按名称查找第一个匹配的奖项
    pub fn find_prize(&self, name: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.name == name)
    }

    pub(crate) fn find_prize_index(&self, name: &str) -> Option<usize> {
        self.prizes.iter().position(|p| p.name == name)
    }

    pub(crate) fn prize_at_mut(&mut self, index: usize) -> Option<&mut Prize> {
        self.prizes.get_mut(index)
    }

    pub(crate) fn push_result(&mut self, result: DrawResult) {
        self.results.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_participant_is_ignored() {
        let mut session = TenantSession::new();
        assert!(session.add_participant("001", "Alice"));
        assert!(!session.add_participant("001", "Alice Again"));

        assert_eq!(session.participants().len(), 1);
        assert_eq!(session.participants()[0].name, "Alice");
    }

    #[test]
    fn test_duplicate_prize_names_allowed_first_wins_lookup() {
        let mut session = TenantSession::new();
        session.add_prize("Grand", "TV", 1, false);
        session.add_prize("Grand", "Car", 5, true);

        assert_eq!(session.prizes().len(), 2);
        let found = session.find_prize("Grand").unwrap();
        assert_eq!(found.item, "TV");
        assert_eq!(session.find_prize_index("Grand"), Some(0));
    }

    #[test]
    fn test_record_win() {
        let mut session = TenantSession::new();
        assert!(!session.has_any_win("001"));

        session.record_win("001", "Grand");
        session.record_win("001", "Special");
        session.record_win("001", "Grand");

        assert!(session.has_any_win("001"));
        assert!(session.has_won("001", "Grand"));
        assert!(!session.has_won("001", "Small"));
        assert_eq!(session.wins_of("001").map(|w| w.len()), Some(2));
    }
}
