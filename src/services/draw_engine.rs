use crate::error::DrawError;
use crate::models::{DrawResult, Participant};
use crate::services::TenantSession;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// 抽奖引擎
///
/// 持有进程级的随机数源（启动时以当前时间为种子），所有租户共用。
#[derive(Debug)]
pub struct DrawEngine {
    rng: Mutex<StdRng>,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawEngine {
    pub fn new() -> Self {
        let seed = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| Utc::now().timestamp_micros()) as u64;
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 计算某奖项当前的合格参与者
    ///
    /// - `draw_from_all = true`: 尚未中过该奖项的所有参与者
    /// - `draw_from_all = false`: 从未中过任何奖项的参与者
    pub fn eligible_participants<'a>(
        session: &'a TenantSession,
        prize_name: &str,
    ) -> Result<Vec<&'a Participant>, DrawError> {
        let prize = session
            .find_prize(prize_name)
            .ok_or(DrawError::PrizeNotFound)?;
        if !prize.is_available() {
            return Err(DrawError::PrizeExhausted);
        }

        let eligible: Vec<&Participant> = session
            .participants()
            .iter()
            .filter(|p| {
                if prize.draw_from_all {
                    !session.has_won(&p.id, prize_name)
                } else {
                    !session.has_any_win(&p.id)
                }
            })
            .collect();

        if eligible.is_empty() {
            return Err(DrawError::NoEligibleParticipants);
        }
        Ok(eligible)
    }

    /// 抽出一位得奖者并提交结果
    ///
    /// 失败时不修改会话。调用方须持有该会话的锁。
    pub fn draw(
        &self,
        session: &mut TenantSession,
        prize_name: &str,
    ) -> Result<DrawResult, DrawError> {
        let winner = {
            let eligible = Self::eligible_participants(session, prize_name)?;
            let index = self.pick_index(eligible.len());
            eligible[index].clone()
        };

        let index = session
            .find_prize_index(prize_name)
            .ok_or(DrawError::PrizeNotFound)?;
        let prize = session
            .prize_at_mut(index)
            .ok_or(DrawError::PrizeNotFound)?;
        prize.quantity -= 1;
        let (prize_name, prize_item) = (prize.name.clone(), prize.item.clone());

        session.record_win(winner.id.clone(), prize_name.clone());

        let result = DrawResult {
            prize_name,
            prize_item,
            winner_id: winner.id,
            winner_name: winner.name,
            drawn_at: Utc::now(),
        };
        session.push_result(result.clone());

        Ok(result)
    }

    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn grand_session() -> TenantSession {
        let mut session = TenantSession::new();
        session.add_prize("Grand", "TV", 1, false);
        session.add_participant("1", "Alice");
        session.add_participant("2", "Bob");
        session
    }

    #[test]
    fn test_draw_then_exhausted() {
        let engine = DrawEngine::with_seed(7);
        let mut session = grand_session();

        let result = engine.draw(&mut session, "Grand").unwrap();
        assert!(["Alice", "Bob"].contains(&result.winner_name.as_str()));
        assert_eq!(result.prize_item, "TV");
        assert_eq!(session.prizes()[0].quantity, 0);
        assert_eq!(session.results().len(), 1);
        assert!(session.has_won(&result.winner_id, "Grand"));

        let err = engine.draw(&mut session, "Grand").unwrap_err();
        assert_eq!(err, DrawError::PrizeExhausted);
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn test_unknown_prize() {
        let engine = DrawEngine::with_seed(1);
        let mut session = grand_session();
        assert_eq!(
            engine.draw(&mut session, "Nope").unwrap_err(),
            DrawError::PrizeNotFound
        );
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_draw_from_all_excludes_previous_winner_of_same_prize() {
        let engine = DrawEngine::with_seed(1);
        let mut session = TenantSession::new();
        session.add_prize("Special", "Phone", 1, true);
        session.add_participant("1", "Alice");
        session.record_win("1", "Special");

        assert_eq!(
            engine.draw(&mut session, "Special").unwrap_err(),
            DrawError::NoEligibleParticipants
        );
        assert_eq!(session.prizes()[0].quantity, 1);
    }

    #[test]
    fn test_draw_from_all_allows_winner_of_other_prize() {
        let engine = DrawEngine::with_seed(1);
        let mut session = TenantSession::new();
        session.add_prize("Special", "Phone", 1, true);
        session.add_participant("001", "Alice");
        session.record_win("001", "Grand");

        let result = engine.draw(&mut session, "Special").unwrap();
        assert_eq!(result.winner_id, "001");
    }

    #[test]
    fn test_exclusive_prize_skips_any_previous_winner() {
        let engine = DrawEngine::with_seed(3);
        let mut session = TenantSession::new();
        session.add_prize("Small", "Mug", 2, false);
        session.add_prize("Lucky", "Pen", 5, true);
        session.add_participant("001", "Alice");
        session.add_participant("002", "Bob");
        // 中过 draw_from_all 奖项也算中过奖
        session.record_win("001", "Lucky");

        let eligible = DrawEngine::eligible_participants(&session, "Small").unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, "002");

        let result = engine.draw(&mut session, "Small").unwrap();
        assert_eq!(result.winner_id, "002");
        assert_eq!(
            engine.draw(&mut session, "Small").unwrap_err(),
            DrawError::NoEligibleParticipants
        );
        assert_eq!(session.prizes()[0].quantity, 1);
    }

    #[test]
    fn test_no_participants() {
        let engine = DrawEngine::with_seed(1);
        let mut session = TenantSession::new();
        session.add_prize("Grand", "TV", 1, false);
        assert_eq!(
            engine.draw(&mut session, "Grand").unwrap_err(),
            DrawError::NoEligibleParticipants
        );
    }

    #[test]
    fn test_duplicate_prize_name_draws_from_first() {
        let engine = DrawEngine::with_seed(1);
        let mut session = grand_session();
        session.add_prize("Grand", "Car", 3, false);

        engine.draw(&mut session, "Grand").unwrap();
        assert_eq!(session.prizes()[0].quantity, 0);
        assert_eq!(session.prizes()[1].quantity, 3);
        // 第一个同名奖项已抽完，不会退而抽第二个
        assert_eq!(
            engine.draw(&mut session, "Grand").unwrap_err(),
            DrawError::PrizeExhausted
        );
    }

    #[test]
    fn test_selection_covers_all_eligible() {
        let engine = DrawEngine::with_seed(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let mut session = TenantSession::new();
            session.add_prize("Grand", "TV", 1, false);
            for i in 0..4 {
                session.add_participant(i.to_string(), format!("P{i}"));
            }
            seen.insert(engine.draw(&mut session, "Grand").unwrap().winner_id);
        }
        assert_eq!(seen.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_draw_respects_eligibility(
            participants in 1usize..12,
            wins in proptest::collection::vec((0usize..12, 0usize..3), 0..20),
            draw_from_all in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let names = ["A", "B", "C"];
            let engine = DrawEngine::with_seed(seed);
            let mut session = TenantSession::new();
            session.add_prize("A", "item", 3, draw_from_all);
            for i in 0..participants {
                session.add_participant(i.to_string(), format!("P{i}"));
            }
            for (who, prize) in wins {
                if who < participants {
                    session.record_win(who.to_string(), names[prize]);
                }
            }
            let before = session.clone();

            match engine.draw(&mut session, "A") {
                Ok(result) => {
                    if draw_from_all {
                        prop_assert!(!before.has_won(&result.winner_id, "A"));
                    } else {
                        prop_assert!(!before.has_any_win(&result.winner_id));
                    }
                    prop_assert_eq!(session.prizes()[0].quantity, 2);
                    prop_assert_eq!(session.results().len(), before.results().len() + 1);
                    prop_assert!(session.has_won(&result.winner_id, "A"));
                }
                Err(e) => {
                    prop_assert_eq!(e, DrawError::NoEligibleParticipants);
                    prop_assert_eq!(session.prizes(), before.prizes());
                    prop_assert!(session.results().is_empty());
                }
            }
        }
    }
}
