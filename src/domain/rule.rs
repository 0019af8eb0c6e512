// ==========================================
// 订单履约分析系统 - 规则定义对象
// ==========================================
// 依据: 履约仿真引擎规格 - Rule 数据模型
// 用途: 配置层反序列化产物, 由规则引擎编译后执行
// 红线: 运行期内规则列表不可变, 执行顺序 = 配置顺序
// ==========================================

use crate::domain::types::MatchMode;
use serde::{Deserialize, Serialize};

// ==========================================
// RuleDef - 单条规则 (原始配置形态)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    /// 规则名 (仅用于日志与错误定位)
    #[serde(default)]
    pub name: String,

    /// 条件组合方式 (默认 ALL)
    #[serde(default = "default_match_mode", rename = "match")]
    pub match_mode: MatchMode,

    /// 条件列表
    #[serde(default)]
    pub conditions: Vec<ConditionDef>,

    /// 动作列表
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

fn default_match_mode() -> MatchMode {
    MatchMode::All
}

// ==========================================
// ConditionDef - 规则条件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDef {
    pub field: String,    // 字段名 (输出列词汇表或透传字段)
    pub operator: String, // 操作符文本 (编译期校验)
    #[serde(default)]
    pub value: String,    // 比较值 (is empty / is not empty 可省略)
}

// ==========================================
// ActionDef - 规则动作
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    #[serde(rename = "type")]
    pub action_type: String,   // 动作类型文本 (编译期校验)
    #[serde(default)]
    pub value: Option<String>, // 动作参数 (部分动作必填)
}
