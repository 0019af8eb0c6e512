// ==========================================
// 订单履约分析系统 - 库存台账
// ==========================================
// 依据: 履约仿真引擎规格 - StockLedger
// 红线: remaining_quantity 恒 >= 0, 越界分配整体拒绝而非截断
// 红线: 仅分配引擎与改判引擎可变更台账,规则引擎只读
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// StockEntry - 库存输入记录
// ==========================================
// 用途: 装载层产物 (列名映射已完成)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub sku: String,                  // SKU
    pub product_name: Option<String>, // 商品名称
    pub quantity: i32,                // 在库数量
}

impl StockEntry {
    pub fn new(sku: &str, quantity: i32) -> Self {
        Self {
            sku: sku.to_string(),
            product_name: None,
            quantity,
        }
    }
}

// ==========================================
// StockLedger - 可用库存台账 (sku -> 余量)
// ==========================================
// 生命周期: 每次分析运行重建,运行结束随结果移交
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockLedger {
    remaining: HashMap<String, i32>,
    product_names: HashMap<String, String>,
}

impl StockLedger {
    /// 从库存输入快照构建台账
    ///
    /// 同一SKU出现多条时保留首条 (与装载层去重口径一致);
    /// 负数在库按 0 计。
    pub fn from_entries(entries: &[StockEntry]) -> Self {
        let mut remaining = HashMap::new();
        let mut product_names = HashMap::new();
        for entry in entries {
            if remaining.contains_key(&entry.sku) {
                continue;
            }
            remaining.insert(entry.sku.clone(), entry.quantity.max(0));
            if let Some(name) = &entry.product_name {
                product_names.insert(entry.sku.clone(), name.clone());
            }
        }
        Self {
            remaining,
            product_names,
        }
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.remaining.contains_key(sku)
    }

    /// 当前余量 (未知SKU返回 None)
    pub fn remaining(&self, sku: &str) -> Option<i32> {
        self.remaining.get(sku).copied()
    }

    pub fn product_name(&self, sku: &str) -> Option<&str> {
        self.product_names.get(sku).map(|s| s.as_str())
    }

    pub fn sku_count(&self) -> usize {
        self.remaining.len()
    }

    /// 检查一组按SKU聚合的需求能否同时满足
    ///
    /// # 返回
    /// 首个无法满足的 (sku, 需求, 余量); 未知SKU余量记 0。
    /// 全部满足时返回 None。
    pub fn check_demand(&self, demand: &[(String, i32)]) -> Option<(String, i32, i32)> {
        for (sku, qty) in demand {
            let available = self.remaining(sku).unwrap_or(0);
            if *qty > available || !self.contains(sku) {
                return Some((sku.clone(), *qty, available));
            }
        }
        None
    }

    /// 原子扣减一组需求: 要么全部扣减,要么台账不动
    ///
    /// # 返回
    /// 扣减成功返回 Ok(()); 任一SKU不足返回首个缺口,台账保持原状。
    pub fn take_demand(&mut self, demand: &[(String, i32)]) -> Result<(), (String, i32, i32)> {
        if let Some(short) = self.check_demand(demand) {
            return Err(short);
        }
        for (sku, qty) in demand {
            if let Some(remaining) = self.remaining.get_mut(sku) {
                *remaining -= qty;
            }
        }
        Ok(())
    }

    /// 归还一组需求 (人工改判回退路径)
    ///
    /// 仅对台账内已知SKU生效,与扣减口径对称,保证往返无漂移。
    pub fn restore_demand(&mut self, demand: &[(String, i32)]) {
        for (sku, qty) in demand {
            if let Some(remaining) = self.remaining.get_mut(sku) {
                *remaining += qty;
            }
        }
    }
}
