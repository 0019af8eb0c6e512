// ==========================================
// 订单履约分析系统 - 统计引擎
// ==========================================
// 职责: 从最终记录集派生运行统计与SKU汇总
// 红线: 纯派生, 不修改记录集, 不触碰台账
// ==========================================

use crate::domain::order::RecordSet;
use crate::domain::types::FulfillmentStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// CourierStats - 单承运商统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierStats {
    pub courier_id: String,         // 承运商 (缺失归入 "Unknown")
    pub orders_assigned: i64,       // 分配到该承运商的完成订单数
    pub repeated_orders_found: i64, // 其中的重复订单数
}

// ==========================================
// AnalysisStats - 运行统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_orders_completed: i64,        // 可履约订单数 (去重)
    pub total_orders_not_completed: i64,    // 不可履约订单数 (去重)
    pub total_items_to_write_off: i64,      // 可履约行数量合计
    pub total_items_not_to_write_off: i64,  // 不可履约行数量合计
    pub couriers_stats: Option<Vec<CourierStats>>, // 无完成订单时为 None
}

// ==========================================
// SummaryRow - SKU 汇总行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,        // 商品名称 (缺失为 "N/A")
    pub sku: String,         // SKU
    pub total_quantity: i64, // 数量合计
}

// ==========================================
// StatisticsEngine - 统计引擎
// ==========================================
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算运行统计
    ///
    /// 口径: 订单数按订单号去重; 状态二分, 非 Fulfillable 的状态
    /// (含规则/人工写入的自定义状态) 一律计入未完成侧, 不设第三桶;
    /// 承运商分组仅统计可履约订单, 承运商缺失计入 "Unknown";
    /// 无可履约订单时 couriers_stats = None。
    pub fn calculate(&self, records: &RecordSet) -> AnalysisStats {
        let mut completed_orders: HashSet<&str> = HashSet::new();
        let mut not_completed_orders: HashSet<&str> = HashSet::new();
        let mut items_to_write_off: i64 = 0;
        let mut items_not_to_write_off: i64 = 0;

        for line in records.lines() {
            match line.fulfillment_status {
                FulfillmentStatus::Fulfillable => {
                    completed_orders.insert(&line.order_id);
                    items_to_write_off += i64::from(line.quantity.max(0));
                }
                _ => {
                    not_completed_orders.insert(&line.order_id);
                    items_not_to_write_off += i64::from(line.quantity.max(0));
                }
            }
        }

        // 承运商分组统计 (按首次出现顺序输出)
        let mut courier_order: Vec<String> = Vec::new();
        let mut per_courier: Vec<(HashSet<&str>, HashSet<&str>)> = Vec::new();
        for line in records.lines() {
            if line.fulfillment_status != FulfillmentStatus::Fulfillable {
                continue;
            }
            let courier = line.courier.clone().unwrap_or_else(|| "Unknown".to_string());
            let slot = match courier_order.iter().position(|c| c == &courier) {
                Some(pos) => pos,
                None => {
                    courier_order.push(courier);
                    per_courier.push((HashSet::new(), HashSet::new()));
                    per_courier.len() - 1
                }
            };
            per_courier[slot].0.insert(&line.order_id);
            if line.system_note.as_deref() == Some(crate::engine::allocation::REPEAT_NOTE) {
                per_courier[slot].1.insert(&line.order_id);
            }
        }

        let couriers_stats = if courier_order.is_empty() {
            None
        } else {
            Some(
                courier_order
                    .into_iter()
                    .zip(per_courier)
                    .map(|(courier_id, (orders, repeats))| CourierStats {
                        courier_id,
                        orders_assigned: orders.len() as i64,
                        repeated_orders_found: repeats.len() as i64,
                    })
                    .collect(),
            )
        };

        AnalysisStats {
            total_orders_completed: completed_orders.len() as i64,
            total_orders_not_completed: not_completed_orders.len() as i64,
            total_items_to_write_off: items_to_write_off,
            total_items_not_to_write_off: items_not_to_write_off,
            couriers_stats,
        }
    }

    /// 可履约SKU汇总 (拣货口径)
    pub fn summarize_fulfilled(&self, records: &RecordSet) -> Vec<SummaryRow> {
        self.summarize(records, |line| {
            line.fulfillment_status == FulfillmentStatus::Fulfillable
        })
    }

    /// 真实缺货SKU汇总: 不可履约行中需求超过期初库存的部分
    ///
    /// 仅因竞争落败 (期初足够但被先行订单占用) 的SKU不计入缺货。
    pub fn summarize_missing(&self, records: &RecordSet) -> Vec<SummaryRow> {
        self.summarize(records, |line| {
            line.fulfillment_status == FulfillmentStatus::NotFulfillable
                && line.quantity > line.stock_on_hand.unwrap_or(0)
        })
    }

    /// 按SKU聚合数量 (保持首次出现顺序)
    fn summarize<F>(&self, records: &RecordSet, filter: F) -> Vec<SummaryRow>
    where
        F: Fn(&crate::domain::order::OrderLine) -> bool,
    {
        let mut rows: Vec<SummaryRow> = Vec::new();
        for line in records.lines().iter().filter(|l| filter(l)) {
            let quantity = i64::from(line.quantity.max(0));
            match rows.iter_mut().find(|r| r.sku == line.sku) {
                Some(row) => row.total_quantity += quantity,
                None => rows.push(SummaryRow {
                    name: line
                        .product_name
                        .clone()
                        .unwrap_or_else(|| "N/A".to_string()),
                    sku: line.sku.clone(),
                    total_quantity: quantity,
                }),
            }
        }
        rows
    }
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
