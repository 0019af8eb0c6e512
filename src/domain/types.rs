// ==========================================
// 订单履约分析系统 - 领域类型定义
// ==========================================
// 依据: 履约仿真引擎规格 - 状态体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 履约状态 (Fulfillment Status)
// ==========================================
// 红线: 分配引擎只产出 Fulfillable / NotFulfillable,
//       Custom 仅来自规则 SET_STATUS 或人工改判
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FulfillmentStatus {
    Fulfillable,    // 可整单履约
    NotFulfillable, // 不可整单履约
    Custom(String), // 用户自定义状态 (规则覆写)
}

impl FulfillmentStatus {
    /// 从状态文本解析 (大小写不敏感)
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "fulfillable" => FulfillmentStatus::Fulfillable,
            "not fulfillable" => FulfillmentStatus::NotFulfillable,
            _ => FulfillmentStatus::Custom(value.to_string()),
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentStatus::Fulfillable => write!(f, "Fulfillable"),
            FulfillmentStatus::NotFulfillable => write!(f, "Not Fulfillable"),
            FulfillmentStatus::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for FulfillmentStatus {
    fn from(value: String) -> Self {
        FulfillmentStatus::parse(&value)
    }
}

impl From<FulfillmentStatus> for String {
    fn from(value: FulfillmentStatus) -> Self {
        value.to_string()
    }
}

// ==========================================
// 订单类型 (Order Kind)
// ==========================================
// 分配时多品订单批次先于单品订单批次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Single, // 单品订单 (恰好1行)
    Multi,  // 多品订单 (≥2行)
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Single => write!(f, "Single"),
            OrderKind::Multi => write!(f, "Multi"),
        }
    }
}

// ==========================================
// 条件组合方式 (Match Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    All, // 全部条件成立 (AND)
    Any, // 任一条件成立 (OR)
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::All => write!(f, "ALL"),
            MatchMode::Any => write!(f, "ANY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfillment_status_parse_known() {
        assert_eq!(
            FulfillmentStatus::parse("Fulfillable"),
            FulfillmentStatus::Fulfillable
        );
        assert_eq!(
            FulfillmentStatus::parse("not fulfillable"),
            FulfillmentStatus::NotFulfillable
        );
    }

    #[test]
    fn test_fulfillment_status_parse_custom() {
        assert_eq!(
            FulfillmentStatus::parse("On Hold"),
            FulfillmentStatus::Custom("On Hold".to_string())
        );
    }

    #[test]
    fn test_fulfillment_status_display_roundtrip() {
        let status = FulfillmentStatus::NotFulfillable;
        assert_eq!(
            FulfillmentStatus::parse(&status.to_string()),
            FulfillmentStatus::NotFulfillable
        );
    }
}
