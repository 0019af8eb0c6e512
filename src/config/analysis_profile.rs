use crate::domain::rule::RuleDef;
use serde::{Deserialize, Serialize};

/// 分析运行配置 (配置层解析产物)
///
/// 核心引擎只消费已解析的配置对象, 不做文件/环境访问;
/// 配置文件的读取与列名映射由外部装载层完成。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisProfile {
    /// 低库存阈值 (余量低于该值时标注 "Low Stock"; None = 关闭)
    #[serde(default)]
    pub low_stock_threshold: Option<i32>,

    /// 重复订单回看窗口 (天; None = 全量历史参与检测)
    #[serde(default)]
    pub repeat_lookback_days: Option<i64>,

    /// 用户规则列表 (执行顺序 = 列表顺序)
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

impl AnalysisProfile {
    /// 从配置JSON文本解析 (测试与嵌入宿主便捷入口)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_json_full() {
        let profile = AnalysisProfile::from_json(
            r#"{
                "low_stock_threshold": 3,
                "repeat_lookback_days": 90,
                "rules": [
                    {
                        "name": "tag vip",
                        "match": "ANY",
                        "conditions": [{"field": "Tags", "operator": "contains", "value": "vip"}],
                        "actions": [{"type": "ADD_TAG", "value": "VIP"}]
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(profile.low_stock_threshold, Some(3));
        assert_eq!(profile.repeat_lookback_days, Some(90));
        assert_eq!(profile.rules.len(), 1);
    }

    #[test]
    fn test_profile_defaults_when_fields_absent() {
        let profile = AnalysisProfile::from_json("{}").unwrap();
        assert_eq!(profile.low_stock_threshold, None);
        assert_eq!(profile.repeat_lookback_days, None);
        assert!(profile.rules.is_empty());
    }
}
