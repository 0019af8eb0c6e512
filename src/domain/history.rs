// ==========================================
// 订单履约分析系统 - 履约历史记录
// ==========================================
// 用途: 重复订单检测的回看输入 (装载层提供)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// HistoryEntry - 一条历史履约记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub order_id: String,                // 历史订单号
    pub executed_at: Option<NaiveDate>,  // 履约日期 (缺失时不受回看窗口过滤)
}

impl HistoryEntry {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            executed_at: None,
        }
    }

    pub fn dated(order_id: &str, executed_at: NaiveDate) -> Self {
        Self {
            order_id: order_id.to_string(),
            executed_at: Some(executed_at),
        }
    }
}
