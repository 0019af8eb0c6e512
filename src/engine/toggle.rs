// ==========================================
// 订单履约分析系统 - 人工改判引擎
// ==========================================
// 依据: 履约仿真引擎规格 - ToggleEngine
// 职责: 运行结束后对单个订单的履约状态人工改判, 并对账台账
// 红线: 改判两次必须精确还原台账数值 (无漂移)
// 红线: 仅 stock_allocated 订单的回退才归还库存,
//       规则 SET_STATUS 覆写不得引发台账变动
// ==========================================

use crate::domain::order::RecordSet;
use crate::domain::stock::StockLedger;
use crate::domain::types::FulfillmentStatus;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, info};

// ==========================================
// ToggleOutcome - 改判结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// 状态已变更, 台账已对账
    Changed,
    /// 目标状态即当前状态, 未做任何变更
    NoChange,
}

// ==========================================
// ToggleEngine - 人工改判引擎
// ==========================================
pub struct ToggleEngine;

impl ToggleEngine {
    pub fn new() -> Self {
        Self
    }

    /// 改判订单履约状态并对账
    ///
    /// 语义:
    /// - 改为 Fulfillable (强制履约): 先做行级校验 (负数量/未知SKU),
    ///   再复用分配引擎的聚合整单判定; 任一不满足时返回错误且状态/台账原样
    /// - 改为 NotFulfillable (撤销履约): 归还此前扣减的数量
    /// - 改为 Custom: 仅改写状态文本, 不触碰台账
    /// - 目标状态即当前状态: 幂等, 无副作用
    ///
    /// # 参数
    /// - records: 上次运行产出的记录集 (就地变更)
    /// - ledger: 同一次运行的库存台账 (就地对账)
    /// - order_id: 待改判订单号
    /// - new_status: 目标状态
    pub fn toggle(
        &self,
        records: &mut RecordSet,
        ledger: &mut StockLedger,
        order_id: &str,
        new_status: FulfillmentStatus,
    ) -> EngineResult<ToggleOutcome> {
        let indices = records.order_line_indices(order_id);
        if indices.is_empty() {
            return Err(EngineError::OrderNotFound {
                order_id: order_id.to_string(),
            });
        }

        let current = records
            .order_status(order_id)
            .unwrap_or(FulfillmentStatus::NotFulfillable);
        if current == new_status {
            debug!(order_id, status = %current, "目标状态即当前状态, 跳过");
            return Ok(ToggleOutcome::NoChange);
        }

        let allocated = records.lines()[indices[0]].stock_allocated;
        // 非正数量的行 (EXCLUDE_SKU 清零/非法输入) 不参与对账
        let demand: Vec<(String, i32)> = records
            .order_demand(order_id)
            .into_iter()
            .filter(|(_, qty)| *qty > 0)
            .collect();

        match &new_status {
            FulfillmentStatus::Fulfillable => {
                // 强制履约: 行级校验后做与分配引擎相同的聚合整单判定。
                // 数量为 0 的行 (EXCLUDE_SKU 清零) 视作已剔除, 不算非法。
                if !allocated {
                    for &idx in &indices {
                        let line = &records.lines()[idx];
                        if line.quantity < 0 {
                            return Err(EngineError::InvalidQuantity {
                                order_id: order_id.to_string(),
                                sku: line.sku.clone(),
                                quantity: line.quantity,
                            });
                        }
                        if line.quantity > 0 && !ledger.contains(&line.sku) {
                            return Err(EngineError::UnknownSku {
                                order_id: order_id.to_string(),
                                sku: line.sku.clone(),
                            });
                        }
                    }
                    if let Err((sku, need, have)) = ledger.take_demand(&demand) {
                        return Err(EngineError::InsufficientStock {
                            order_id: order_id.to_string(),
                            skus: format!("{} (need={}, have={})", sku, need, have),
                        });
                    }
                }
                for &idx in &indices {
                    let line = &mut records.lines_mut()[idx];
                    line.fulfillment_status = FulfillmentStatus::Fulfillable;
                    line.fulfillment_reason = Some("MANUAL_FORCE_FULFILL".to_string());
                    line.stock_allocated = true;
                }
                info!(order_id, "人工强制履约完成, 台账已扣减");
            }
            FulfillmentStatus::NotFulfillable => {
                // 撤销履约: 仅归还确实占用的库存
                if allocated {
                    ledger.restore_demand(&demand);
                }
                for &idx in &indices {
                    let line = &mut records.lines_mut()[idx];
                    line.fulfillment_status = FulfillmentStatus::NotFulfillable;
                    line.fulfillment_reason = Some("MANUAL_UNFULFILL".to_string());
                    line.stock_allocated = false;
                }
                info!(order_id, restored = allocated, "人工撤销履约完成");
            }
            FulfillmentStatus::Custom(label) => {
                // 自定义状态仅是操作员标注, 台账与占用标记不变
                for &idx in &indices {
                    let line = &mut records.lines_mut()[idx];
                    line.fulfillment_status = new_status.clone();
                    line.fulfillment_reason = Some("MANUAL_RELABEL".to_string());
                }
                info!(order_id, label = %label, "人工状态标注完成, 台账未变更");
            }
        }

        Ok(ToggleOutcome::Changed)
    }
}

impl Default for ToggleEngine {
    fn default() -> Self {
        Self::new()
    }
}
