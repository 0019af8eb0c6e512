// ==========================================
// 订单履约分析系统 - 规则引擎
// ==========================================
// 依据: 履约仿真引擎规格 - RuleEngine
// 职责: 按配置顺序对记录集求值条件并执行动作
// 红线: 操作符/动作为封闭枚举, 非法定义在构造期整体拒绝
// 红线: 规则引擎绝不触碰库存台账
// 红线: 规则按配置顺序执行, 后续规则看到前序规则的效果
// ==========================================

use crate::domain::order::RecordSet;
use crate::domain::rule::{ActionDef, ConditionDef, RuleDef};
use crate::domain::types::{FulfillmentStatus, MatchMode};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, info};

/// EXCLUDE_SKU 动作追加的规则标签
pub const SKU_EXCLUDED_TAG: &str = "SKU_EXCLUDED";

// ==========================================
// ConditionOperator - 条件操作符 (封闭枚举)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    /// 解析配置文本 (大小写不敏感), 未知操作符返回 None
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "equals" => Some(Self::Equals),
            "does not equal" => Some(Self::NotEquals),
            "contains" => Some(Self::Contains),
            "does not contain" => Some(Self::NotContains),
            "is greater than" => Some(Self::GreaterThan),
            "is less than" => Some(Self::LessThan),
            "starts with" => Some(Self::StartsWith),
            "ends with" => Some(Self::EndsWith),
            "is empty" => Some(Self::IsEmpty),
            "is not empty" => Some(Self::IsNotEmpty),
            _ => None,
        }
    }

    /// 是否为数值比较操作符 (比较值需在构造期通过数值校验)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan)
    }

    /// 对单行字段值求值
    ///
    /// 字符串比较大小写不敏感; 缺失字段按空串处理;
    /// 数值比较中字段值解析失败 → 条件为假 (不是错误)。
    pub fn eval(&self, field_value: Option<&str>, rule_value: &str) -> bool {
        let field = field_value.unwrap_or("");
        match self {
            Self::Equals => field.to_lowercase() == rule_value.to_lowercase(),
            Self::NotEquals => field.to_lowercase() != rule_value.to_lowercase(),
            Self::Contains => field.to_lowercase().contains(&rule_value.to_lowercase()),
            Self::NotContains => !field.to_lowercase().contains(&rule_value.to_lowercase()),
            Self::GreaterThan => match (field.trim().parse::<f64>(), rule_value.trim().parse::<f64>()) {
                (Ok(f), Ok(r)) => f > r,
                _ => false,
            },
            Self::LessThan => match (field.trim().parse::<f64>(), rule_value.trim().parse::<f64>()) {
                (Ok(f), Ok(r)) => f < r,
                _ => false,
            },
            Self::StartsWith => field.to_lowercase().starts_with(&rule_value.to_lowercase()),
            Self::EndsWith => field.to_lowercase().ends_with(&rule_value.to_lowercase()),
            Self::IsEmpty => field.is_empty(),
            Self::IsNotEmpty => !field.is_empty(),
        }
    }
}

// ==========================================
// CompiledCondition / CompiledAction
// ==========================================

#[derive(Debug, Clone)]
struct CompiledCondition {
    field: String,
    operator: ConditionOperator,
    value: String,
}

#[derive(Debug, Clone)]
enum CompiledAction {
    /// 追加规则标签到 Status_Note (不覆盖已有标签)
    AddTag(String),
    /// 无条件覆写履约状态 (覆盖分配结果)
    SetStatus(FulfillmentStatus),
    /// 覆写优先级
    SetPriority(String),
    /// 报表排除 (本次运行内粘滞)
    ExcludeFromReport,
    /// 指定SKU的匹配行数量清零并打标
    /// 已知限制: 不回补台账 (库存扣减已发生或未发生, 仅影响下游报表)
    ExcludeSku(String),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    match_mode: MatchMode,
    conditions: Vec<CompiledCondition>,
    actions: Vec<CompiledAction>,
}

impl CompiledRule {
    /// 单行条件匹配 (ALL = 全真, ANY = 至少一真; 无条件恒假)
    fn matches(&self, records: &RecordSet, idx: usize) -> bool {
        if self.conditions.is_empty() {
            return false;
        }
        let line = &records.lines()[idx];
        let mut results = self
            .conditions
            .iter()
            .map(|c| c.operator.eval(line.field_value(&c.field).as_deref(), &c.value));
        match self.match_mode {
            MatchMode::All => results.all(|r| r),
            MatchMode::Any => results.any(|r| r),
        }
    }
}

// ==========================================
// RuleEngine - 规则引擎
// ==========================================
#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// 编译规则列表
    ///
    /// 任一规则含未知操作符/未知动作/缺失必填参数时整体失败,
    /// 保证坏配置不会污染已部分处理的记录集。
    pub fn new(defs: &[RuleDef]) -> EngineResult<Self> {
        let rules = defs
            .iter()
            .map(Self::compile_rule)
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn compile_rule(def: &RuleDef) -> EngineResult<CompiledRule> {
        let conditions = def
            .conditions
            .iter()
            .map(|c| Self::compile_condition(&def.name, c))
            .collect::<EngineResult<Vec<_>>>()?;
        let actions = def
            .actions
            .iter()
            .map(|a| Self::compile_action(&def.name, a))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(CompiledRule {
            name: def.name.clone(),
            match_mode: def.match_mode,
            conditions,
            actions,
        })
    }

    fn compile_condition(
        rule_name: &str,
        def: &ConditionDef,
    ) -> EngineResult<CompiledCondition> {
        let operator = ConditionOperator::parse(&def.operator).ok_or_else(|| {
            EngineError::InvalidRuleDefinition {
                rule: rule_name.to_string(),
                message: format!("未知操作符: {}", def.operator),
            }
        })?;
        if operator.is_numeric() && def.value.trim().parse::<f64>().is_err() {
            return Err(EngineError::InvalidRuleDefinition {
                rule: rule_name.to_string(),
                message: format!(
                    "数值操作符的比较值无法解析为数字: {}",
                    def.value
                ),
            });
        }
        Ok(CompiledCondition {
            field: def.field.clone(),
            operator,
            value: def.value.clone(),
        })
    }

    fn compile_action(rule_name: &str, def: &ActionDef) -> EngineResult<CompiledAction> {
        let require_value = || {
            def.value.clone().filter(|v| !v.is_empty()).ok_or_else(|| {
                EngineError::InvalidRuleDefinition {
                    rule: rule_name.to_string(),
                    message: format!("动作 {} 缺少 value 参数", def.action_type),
                }
            })
        };
        match def.action_type.trim().to_uppercase().as_str() {
            "ADD_TAG" => Ok(CompiledAction::AddTag(require_value()?)),
            "SET_STATUS" => Ok(CompiledAction::SetStatus(FulfillmentStatus::parse(
                &require_value()?,
            ))),
            "SET_PRIORITY" => Ok(CompiledAction::SetPriority(require_value()?)),
            "EXCLUDE_FROM_REPORT" => Ok(CompiledAction::ExcludeFromReport),
            "EXCLUDE_SKU" => Ok(CompiledAction::ExcludeSku(require_value()?)),
            other => Err(EngineError::InvalidRuleDefinition {
                rule: rule_name.to_string(),
                message: format!("未知动作类型: {}", other),
            }),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按配置顺序应用全部规则
    ///
    /// 顺序语义 (契约): 每条规则先对"当前"记录状态收集匹配行,
    /// 再执行动作; 前序规则的写入对后续规则可见, 不做快照。
    pub fn apply(&self, mut records: RecordSet) -> RecordSet {
        info!(rule_count = self.rules.len(), "开始应用规则");
        for rule in &self.rules {
            let matches: Vec<usize> = (0..records.len())
                .filter(|&idx| rule.matches(&records, idx))
                .collect();
            debug!(rule = %rule.name, match_count = matches.len(), "规则匹配完成");
            if matches.is_empty() {
                continue;
            }
            for action in &rule.actions {
                Self::execute_action(&mut records, &matches, action);
            }
        }
        records
    }

    fn execute_action(records: &mut RecordSet, matches: &[usize], action: &CompiledAction) {
        match action {
            CompiledAction::AddTag(tag) => {
                for &idx in matches {
                    records.lines_mut()[idx].append_status_note(tag);
                }
            }
            CompiledAction::SetStatus(status) => {
                for &idx in matches {
                    records.lines_mut()[idx].fulfillment_status = status.clone();
                }
            }
            CompiledAction::SetPriority(priority) => {
                for &idx in matches {
                    records.lines_mut()[idx].priority = Some(priority.clone());
                }
            }
            CompiledAction::ExcludeFromReport => {
                for &idx in matches {
                    records.lines_mut()[idx].excluded_from_report = true;
                }
            }
            CompiledAction::ExcludeSku(sku) => {
                for &idx in matches {
                    let line = &mut records.lines_mut()[idx];
                    if line.sku == *sku {
                        line.quantity = 0;
                        line.append_status_note(SKU_EXCLUDED_TAG);
                    }
                }
            }
        }
    }
}
