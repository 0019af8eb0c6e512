// ==========================================
// 订单履约分析系统 - 核心库
// ==========================================
// 系统定位: 决策支持系统 (人工最终控制权)
// 边界: 文件装载/列名映射/报表生成/界面展示均为外部协作层,
//       本库只处理已物化的内存记录与台账
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FulfillmentStatus, MatchMode, OrderKind};

// 领域实体
pub use domain::{
    ActionDef, ConditionDef, HistoryEntry, OrderLine, RecordSet, RuleDef, StockEntry,
    StockLedger,
};

// 引擎
pub use engine::{
    AllocationEngine, AnalysisOrchestrator, AnalysisResult, AnalysisStats, CourierStats,
    EngineError, EngineResult, RuleEngine, StatisticsEngine, SummaryRow, ToggleEngine,
    ToggleOutcome,
};

// 配置
pub use config::AnalysisProfile;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "订单履约分析系统";
