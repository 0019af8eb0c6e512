// ==========================================
// 订单履约分析系统 - 分析编排器
// ==========================================
// 职责: 协调一次完整分析运行 (台账构建 → 分配 → 规则 → 统计)
// 红线: 一次运行对调用方原子: 同步执行到底, 无部分成功返回
// ==========================================

use crate::config::AnalysisProfile;
use crate::domain::history::HistoryEntry;
use crate::domain::order::{OrderLine, RecordSet};
use crate::domain::stock::{StockEntry, StockLedger};
use crate::engine::allocation::AllocationEngine;
use crate::engine::error::EngineResult;
use crate::engine::rules::RuleEngine;
use crate::engine::statistics::{AnalysisStats, StatisticsEngine, SummaryRow};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// AnalysisResult - 一次分析运行的完整产出
// ==========================================
// 用途: 交付下游 (报表/展示/人工改判) 的单一快照;
//       台账随行, 供改判引擎继续对账
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub run_id: Uuid,                      // 运行ID
    pub executed_at: DateTime<Utc>,        // 运行时间戳
    pub records: RecordSet,                // 标注完成的记录集
    pub ledger: StockLedger,               // 运行后的库存台账
    pub summary_fulfilled: Vec<SummaryRow>, // 可履约SKU汇总
    pub summary_missing: Vec<SummaryRow>,  // 真实缺货SKU汇总
    pub stats: AnalysisStats,              // 运行统计
}

// ==========================================
// AnalysisOrchestrator - 分析编排器
// ==========================================
pub struct AnalysisOrchestrator {
    profile: AnalysisProfile,
    rules: Option<RuleEngine>,
    statistics: StatisticsEngine,
}

impl AnalysisOrchestrator {
    /// 创建编排器, 规则在此一次性编译
    ///
    /// 任一规则非法即整体失败 (InvalidRuleDefinition),
    /// 保证坏配置在任何记录被处理前暴露。
    pub fn new(profile: AnalysisProfile) -> EngineResult<Self> {
        let rules = if profile.rules.is_empty() {
            None
        } else {
            Some(RuleEngine::new(&profile.rules)?)
        };
        Ok(Self {
            profile,
            rules,
            statistics: StatisticsEngine::new(),
        })
    }

    /// 执行一次完整分析运行
    ///
    /// 流程:
    /// 1) 由库存快照构建台账
    /// 2) 按回看策略解析重复订单集合
    /// 3) 分配引擎 (判定可履约性, 扣减台账)
    /// 4) 规则引擎 (如配置了规则)
    /// 5) 统计引擎
    ///
    /// # 参数
    /// - lines: 订单行 (装载层产物, 顺序即输入顺序)
    /// - stock: 库存输入快照
    /// - history: 履约历史 (重复订单检测输入)
    /// - today: 当前日期 (回看窗口基准, 显式传入保证可重放)
    pub fn run(
        &self,
        lines: Vec<OrderLine>,
        stock: &[StockEntry],
        history: &[HistoryEntry],
        today: NaiveDate,
    ) -> AnalysisResult {
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            line_count = lines.len(),
            stock_count = stock.len(),
            history_count = history.len(),
            "开始分析运行"
        );

        let mut ledger = StockLedger::from_entries(stock);
        debug!(sku_count = ledger.sku_count(), "库存台账构建完成");

        let repeat_orders = self.resolve_repeat_orders(history, today);
        debug!(repeat_count = repeat_orders.len(), "重复订单回看集合解析完成");

        let allocation =
            AllocationEngine::new(self.profile.low_stock_threshold, repeat_orders);
        let mut records = allocation.allocate(lines, &mut ledger);

        if let Some(rules) = &self.rules {
            records = rules.apply(records);
        }

        let stats = self.statistics.calculate(&records);
        let summary_fulfilled = self.statistics.summarize_fulfilled(&records);
        let summary_missing = self.statistics.summarize_missing(&records);

        info!(
            %run_id,
            completed = stats.total_orders_completed,
            not_completed = stats.total_orders_not_completed,
            "分析运行完成"
        );

        AnalysisResult {
            run_id,
            executed_at: Utc::now(),
            records,
            ledger,
            summary_fulfilled,
            summary_missing,
            stats,
        }
    }

    /// 按回看策略解析参与重复检测的历史订单号集合
    ///
    /// 规则: 配置了回看窗口时, 仅保留窗口内的历史记录;
    /// 无日期的历史记录不受窗口过滤 (口径从宽)。
    fn resolve_repeat_orders(
        &self,
        history: &[HistoryEntry],
        today: NaiveDate,
    ) -> HashSet<String> {
        match self.profile.repeat_lookback_days {
            None => history.iter().map(|h| h.order_id.clone()).collect(),
            Some(days) => {
                let cutoff = today - Duration::days(days);
                history
                    .iter()
                    .filter(|h| match h.executed_at {
                        Some(date) => date >= cutoff,
                        None => true,
                    })
                    .map(|h| h.order_id.clone())
                    .collect()
            }
        }
    }
}
