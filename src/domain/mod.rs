// ==========================================
// 订单履约分析系统 - 领域层
// ==========================================
// 职责: 实体与封闭类型定义, 无业务流程
// ==========================================

pub mod history;
pub mod order;
pub mod rule;
pub mod stock;
pub mod types;

pub use history::HistoryEntry;
pub use order::{OrderLine, RecordSet};
pub use rule::{ActionDef, ConditionDef, RuleDef};
pub use stock::{StockEntry, StockLedger};
pub use types::{FulfillmentStatus, MatchMode, OrderKind};
