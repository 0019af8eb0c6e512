// ==========================================
// 订单履约分析系统 - 订单领域模型
// ==========================================
// 依据: 履约仿真引擎规格 - 数据模型
// 红线: quantity 输入必须 > 0, 违规行由分配引擎标注后继续
// ==========================================

use crate::domain::types::{FulfillmentStatus, OrderKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// OrderLine - 订单行 (一单内的一个SKU)
// ==========================================
// 用途: 装载层写入基础字段,引擎层写入标注字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    // ===== 基础字段 (装载层写入) =====
    pub order_id: String,                  // 订单号 (同单各行相同)
    pub sku: String,                       // SKU
    pub quantity: i32,                     // 需求数量 (输入必须 > 0)
    pub product_name: Option<String>,      // 商品名称 (库存快照回填)
    pub courier: Option<String>,           // 承运商 (装载层已标准化)
    pub destination_country: Option<String>, // 目的国

    // ===== 透传字段 (仅供规则条件引用) =====
    #[serde(default)]
    pub extra: HashMap<String, String>,    // 调用方自定义字段 (Total Price/Tags/Notes...)

    // ===== 引擎标注字段 =====
    pub kind: Option<OrderKind>,           // 订单类型 (分配引擎派生)
    pub fulfillment_status: FulfillmentStatus, // 履约状态
    pub fulfillment_reason: Option<String>, // 判定原因码 (可恢复错误必须可见)
    pub stock_on_hand: Option<i32>,        // 期初库存快照 (未知SKU为 None)
    pub stock_alert: Option<String>,       // 低库存提示 ("Low Stock")
    pub system_note: Option<String>,       // 系统标注 (重复订单 "Repeat")
    pub stock_allocated: bool,             // 本行所属订单当前占用台账库存

    // ===== 规则标注字段 =====
    pub status_note: String,               // 规则标签 (", " 拼接)
    pub priority: Option<String>,          // 优先级 (仅规则写入)
    pub excluded_from_report: bool,        // 报表排除标记 (本次运行内不可复位)
}

impl OrderLine {
    /// 创建基础订单行,标注字段取默认值
    pub fn new(order_id: &str, sku: &str, quantity: i32) -> Self {
        Self {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity,
            product_name: None,
            courier: None,
            destination_country: None,
            extra: HashMap::new(),
            kind: None,
            fulfillment_status: FulfillmentStatus::NotFulfillable,
            fulfillment_reason: None,
            stock_on_hand: None,
            stock_alert: None,
            system_note: None,
            stock_allocated: false,
            status_note: String::new(),
            priority: None,
            excluded_from_report: false,
        }
    }

    /// 按列名取字段值,供规则条件求值
    ///
    /// 命名沿用输出列词汇表;未命中已知列时回落到透传字段。
    /// 缺失字段返回 None,由操作符按空值语义处理。
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "Order_Number" => Some(self.order_id.clone()),
            "SKU" => Some(self.sku.clone()),
            "Quantity" => Some(self.quantity.to_string()),
            "Order_Type" => self.kind.map(|k| k.to_string()),
            "Order_Fulfillment_Status" => Some(self.fulfillment_status.to_string()),
            "Product_Name" => self.product_name.clone(),
            "Shipping_Provider" => self.courier.clone(),
            "Destination_Country" => self.destination_country.clone(),
            "Stock_Alert" => self.stock_alert.clone(),
            "System_note" => self.system_note.clone(),
            "Status_Note" => Some(self.status_note.clone()),
            "Priority" => self.priority.clone(),
            _ => self.extra.get(field).cloned(),
        }
    }

    /// 追加规则标签 (", " 拼接,重复标签跳过)
    pub fn append_status_note(&mut self, tag: &str) {
        if self.status_note.split(", ").any(|t| t == tag) {
            return;
        }
        if self.status_note.is_empty() {
            self.status_note = tag.to_string();
        } else {
            self.status_note = format!("{}, {}", self.status_note, tag);
        }
    }
}

// ==========================================
// RecordSet - 分析结果记录集
// ==========================================
// 用途: 分配引擎产出,规则引擎原地变换,下游消费
// 红线: 行顺序即输入顺序,不得重排
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    lines: Vec<OrderLine>,
}

impl RecordSet {
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [OrderLine] {
        &mut self.lines
    }

    pub fn into_lines(self) -> Vec<OrderLine> {
        self.lines
    }

    /// 订单号列表 (按首次出现顺序去重)
    pub fn order_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for line in &self.lines {
            if seen.insert(line.order_id.clone()) {
                ids.push(line.order_id.clone());
            }
        }
        ids
    }

    /// 指定订单的行索引
    pub fn order_line_indices(&self, order_id: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.order_id == order_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// 订单整体状态 (不变式: 同单各行状态一致,取首行)
    pub fn order_status(&self, order_id: &str) -> Option<FulfillmentStatus> {
        self.lines
            .iter()
            .find(|l| l.order_id == order_id)
            .map(|l| l.fulfillment_status.clone())
    }

    /// 订单按SKU聚合的需求量 (同单同SKU多行合并)
    ///
    /// 整单判定必须看聚合需求,逐行判定会漏判同SKU多行同时满足的情况。
    pub fn order_demand(&self, order_id: &str) -> Vec<(String, i32)> {
        let mut demand: Vec<(String, i32)> = Vec::new();
        for line in self.lines.iter().filter(|l| l.order_id == order_id) {
            match demand.iter_mut().find(|(sku, _)| sku == &line.sku) {
                Some((_, qty)) => *qty += line.quantity,
                None => demand.push((line.sku.clone(), line.quantity)),
            }
        }
        demand
    }
}
