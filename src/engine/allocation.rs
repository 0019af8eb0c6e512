// ==========================================
// 订单履约分析系统 - 库存分配引擎
// ==========================================
// 依据: 履约仿真引擎规格 - AllocationEngine
// 职责: 在竞争订单间分配可用库存, 判定整单可履约性
// 红线: 多品订单整单判定 (要么全扣, 要么不动台账)
// 红线: 多品订单批次先于单品订单批次, 批次内按输入顺序
// 红线: 所有判定必须输出 reason
// ==========================================

use crate::domain::order::{OrderLine, RecordSet};
use crate::domain::stock::StockLedger;
use crate::domain::types::{FulfillmentStatus, OrderKind};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// 重复订单标注值
pub const REPEAT_NOTE: &str = "Repeat";

/// 低库存标注值
pub const LOW_STOCK_ALERT: &str = "Low Stock";

// ==========================================
// AllocationEngine - 库存分配引擎
// ==========================================
pub struct AllocationEngine {
    /// 低库存阈值 (余量 < 阈值时标注, 不影响可履约性)
    low_stock_threshold: Option<i32>,

    /// 重复订单回看集合 (历史订单号, 调用方按回看策略筛好)
    repeat_orders: HashSet<String>,
}

impl AllocationEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - low_stock_threshold: 低库存阈值 (None = 不标注)
    /// - repeat_orders: 历史订单号集合
    pub fn new(low_stock_threshold: Option<i32>, repeat_orders: HashSet<String>) -> Self {
        Self {
            low_stock_threshold,
            repeat_orders,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行库存分配仿真
    ///
    /// 流程:
    /// 1) 按订单号分组 (保持首次出现顺序)
    /// 2) 多品订单批次 (≥2行) 按输入顺序整单判定, 聚合需求原子扣减
    /// 3) 单品订单批次按输入顺序逐单判定
    /// 4) 重复订单标注 / 低库存标注
    ///
    /// 单行校验错误 (数量非法/未知SKU) 收敛到所属订单:
    /// 该订单 NotFulfillable 且原因落在记录上, 整批继续。
    ///
    /// # 参数
    /// - lines: 订单行 (装载层产物, 顺序即输入顺序)
    /// - ledger: 库存台账 (本次运行独占借用, 就地扣减)
    ///
    /// # 返回
    /// 标注完成的记录集 (行顺序与输入一致)
    pub fn allocate(&self, lines: Vec<OrderLine>, ledger: &mut StockLedger) -> RecordSet {
        let mut records = RecordSet::new(lines);

        // 期初库存快照 (扣减前逐行捕获, 供缺货汇总使用)
        let initial_stock: Vec<Option<i32>> = records
            .lines()
            .iter()
            .map(|line| ledger.remaining(&line.sku))
            .collect();

        // 按订单号分组, 保持首次出现顺序
        let order_ids = records.order_ids();
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, line) in records.lines().iter().enumerate() {
            groups.entry(line.order_id.clone()).or_default().push(idx);
        }

        let multi_orders: Vec<&String> =
            order_ids.iter().filter(|id| groups[*id].len() >= 2).collect();
        let single_orders: Vec<&String> =
            order_ids.iter().filter(|id| groups[*id].len() == 1).collect();

        info!(
            line_count = records.len(),
            order_count = order_ids.len(),
            multi_count = multi_orders.len(),
            single_count = single_orders.len(),
            "开始库存分配仿真"
        );

        // 多品订单批次优先: 整单履约的代价高于单品订单,
        // 先分配可最大化完整多品订单数量
        let mut fulfilled = 0usize;
        for order_id in multi_orders.into_iter().chain(single_orders) {
            let indices = groups[order_id].clone();
            let kind = if indices.len() >= 2 {
                OrderKind::Multi
            } else {
                OrderKind::Single
            };
            if self.allocate_order(&mut records, ledger, order_id, &indices, kind) {
                fulfilled += 1;
            }
        }

        // 重复订单标注 (与库存无关的透传标注)
        for line in records.lines_mut() {
            if self.repeat_orders.contains(&line.order_id) {
                line.system_note = Some(REPEAT_NOTE.to_string());
            }
        }

        // 期初快照/商品名回填 + 低库存标注
        for (idx, line) in records.lines_mut().iter_mut().enumerate() {
            line.stock_on_hand = initial_stock[idx];
            if line.product_name.is_none() {
                line.product_name = ledger.product_name(&line.sku).map(str::to_string);
            }
            if let (Some(threshold), Some(remaining)) =
                (self.low_stock_threshold, ledger.remaining(&line.sku))
            {
                if remaining < threshold {
                    line.stock_alert = Some(LOW_STOCK_ALERT.to_string());
                }
            }
        }

        info!(
            fulfilled_orders = fulfilled,
            rejected_orders = order_ids.len() - fulfilled,
            "库存分配仿真完成"
        );

        records
    }

    // ==========================================
    // 单订单判定
    // ==========================================

    /// 判定并落账一个订单, 返回是否整单可履约
    fn allocate_order(
        &self,
        records: &mut RecordSet,
        ledger: &mut StockLedger,
        order_id: &str,
        indices: &[usize],
        kind: OrderKind,
    ) -> bool {
        // 行级校验: 数量非法 / 未知SKU → 整单拒绝, 原因落行
        let mut invalid = false;
        for &idx in indices {
            let line = &records.lines()[idx];
            let reason = if line.quantity <= 0 {
                Some(format!("INVALID_QUANTITY: quantity={}", line.quantity))
            } else if !ledger.contains(&line.sku) {
                Some(format!("UNKNOWN_SKU: sku={}", line.sku))
            } else {
                None
            };
            if let Some(reason) = reason {
                invalid = true;
                records.lines_mut()[idx].fulfillment_reason = Some(reason);
            }
        }

        if invalid {
            debug!(order_id, "订单包含非法行, 整单拒绝");
            let fallback = "ORDER_REJECTED: invalid line in order".to_string();
            self.mark_order(records, indices, kind, FulfillmentStatus::NotFulfillable, None);
            for &idx in indices {
                let line = &mut records.lines_mut()[idx];
                if line.fulfillment_reason.is_none() {
                    line.fulfillment_reason = Some(fallback.clone());
                }
            }
            return false;
        }

        // 聚合需求整单判定: 同SKU多行必须可同时满足
        let demand = records.order_demand(order_id);
        match ledger.take_demand(&demand) {
            Ok(()) => {
                debug!(order_id, ?kind, "整单可履约, 台账已扣减");
                self.mark_order(
                    records,
                    indices,
                    kind,
                    FulfillmentStatus::Fulfillable,
                    Some("ALLOCATED".to_string()),
                );
                for &idx in indices {
                    records.lines_mut()[idx].stock_allocated = true;
                }
                true
            }
            Err((sku, need, have)) => {
                debug!(order_id, sku, need, have, "库存缺口, 整单拒绝");
                let reason = format!("SHORT_STOCK: sku={} need={} have={}", sku, need, have);
                self.mark_order(
                    records,
                    indices,
                    kind,
                    FulfillmentStatus::NotFulfillable,
                    Some(reason),
                );
                false
            }
        }
    }

    /// 同单各行统一落状态 (不变式: 订单状态是行状态的确定函数)
    fn mark_order(
        &self,
        records: &mut RecordSet,
        indices: &[usize],
        kind: OrderKind,
        status: FulfillmentStatus,
        reason: Option<String>,
    ) {
        for &idx in indices {
            let line = &mut records.lines_mut()[idx];
            line.kind = Some(kind);
            line.fulfillment_status = status.clone();
            if let Some(reason) = &reason {
                line.fulfillment_reason = Some(reason.clone());
            }
        }
    }
}
