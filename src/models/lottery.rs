//! 抽奖相关的数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 奖项
///
/// `name` 是租户内的查找键，但不保证唯一：重复名称允许新增，查找时取第一个。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    /// 奖项名称
    pub name: String,
    /// 奖品
    pub item: String,
    /// 剩余数量
    pub quantity: u32,
    /// true: 所有参与者都可抽（同一奖项每人限一次）; false: 仅限从未中奖者
    pub draw_from_all: bool,
}

impl Prize {
    pub fn new(
        name: impl Into<String>,
        item: impl Into<String>,
        quantity: u32,
        draw_from_all: bool,
    ) -> Self {
        Self {
            name: name.into(),
            item: item.into(),
            quantity,
            draw_from_all,
        }
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// 参与者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    /// 员工编号（租户内唯一）
    pub id: String,
    /// 姓名
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 单次抽奖结果（只追加，不修改）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub prize_name: String,
    pub prize_item: String,
    pub winner_id: String,
    pub winner_name: String,
    /// 抽奖时间
    pub drawn_at: DateTime<Utc>,
}

/// 新增奖项请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPrizeRequest {
    pub name: String,
    #[serde(default)]
    pub item: String,
    pub quantity: u32,
    #[serde(default)]
    pub draw_from_all: bool,
}

/// 新增参与者请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AddParticipantRequest {
    pub id: String,
    pub name: String,
}

/// 抽奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub prize_name: String,
}

/// 抽奖响应：本次结果 + 最新奖项列表
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub result: DrawResult,
    pub prizes: Vec<Prize>,
}

/// 抽奖界面总览
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LotteryOverview {
    pub prizes: Vec<Prize>,
    pub participants: Vec<Participant>,
    pub results: Vec<DrawResult>,
}

/// CSV 导入结果
#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    PrizeImportResponse = CsvImportResponse<Prize>,
    ParticipantImportResponse = CsvImportResponse<Participant>
)]
pub struct CsvImportResponse<T> {
    /// 导入的行数（重复的参与者也计入）
    pub imported: usize,
    /// 格式错误被跳过的行数
    pub skipped: usize,
    /// 导入后的完整列表
    pub items: Vec<T>,
}
