// ==========================================
// 订单履约分析系统 - 引擎层
// ==========================================
// 职责: 履约仿真与规则处理的业务引擎, 无 I/O
// 红线: 台账只被分配引擎与改判引擎变更; 所有判定输出 reason
// ==========================================

pub mod allocation;
pub mod error;
pub mod orchestrator;
pub mod rules;
pub mod statistics;
pub mod toggle;

// 重导出核心引擎
pub use allocation::{AllocationEngine, LOW_STOCK_ALERT, REPEAT_NOTE};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{AnalysisOrchestrator, AnalysisResult};
pub use rules::{ConditionOperator, RuleEngine, SKU_EXCLUDED_TAG};
pub use statistics::{AnalysisStats, CourierStats, StatisticsEngine, SummaryRow};
pub use toggle::{ToggleEngine, ToggleOutcome};
