// ==========================================
// 订单履约分析系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 传播策略: 单行/单订单校验错误收敛到该订单, 不中断整批;
//           规则定义错误在构造期快速失败, 不污染记录集
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 行级校验错误 =====
    // 批量分配路径降级为 NotFulfillable 并以原因码落行;
    // 人工强制履约路径直接返回调用方
    #[error("需求数量非法: order_id={order_id}, sku={sku}, quantity={quantity}")]
    InvalidQuantity {
        order_id: String,
        sku: String,
        quantity: i32,
    },

    #[error("未知SKU: order_id={order_id}, sku={sku}")]
    UnknownSku { order_id: String, sku: String },

    // ===== 人工改判错误 =====
    #[error("库存不足, 无法强制履约: order_id={order_id}, 缺口SKU: {skus}")]
    InsufficientStock { order_id: String, skus: String },

    #[error("订单未找到: {order_id}")]
    OrderNotFound { order_id: String },

    // ===== 规则配置错误 (构造期, 致命) =====
    #[error("规则定义非法 (rule={rule}): {message}")]
    InvalidRuleDefinition { rule: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
