// ==========================================
// 人工改判引擎集成测试
// ==========================================
// 职责: 在完整运行产物上验证改判与对账
// 契约: 改判可逆且精确 (任意次无操作改判穿插不产生漂移)
// ==========================================

use chrono::NaiveDate;
use fulfillment_dss::{
    AnalysisOrchestrator, AnalysisProfile, AnalysisResult, EngineError, FulfillmentStatus,
    OrderLine, StockEntry, ToggleEngine, ToggleOutcome,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
}

/// 构造一次完整运行: A=5/B=1, 多品#1 可履约, 单品#2 拒绝, 单品#3 可履约
fn analyzed() -> AnalysisResult {
    let orchestrator = AnalysisOrchestrator::new(AnalysisProfile::default()).unwrap();
    orchestrator.run(
        vec![
            OrderLine::new("#1", "A", 3),
            OrderLine::new("#1", "B", 1),
            OrderLine::new("#2", "A", 3),
            OrderLine::new("#3", "A", 2),
        ],
        &[StockEntry::new("A", 5), StockEntry::new("B", 1)],
        &[],
        today(),
    )
}

#[test]
fn test_unfulfill_then_force_fulfill_restores_ledger_exactly() {
    let mut result = analyzed();
    let engine = ToggleEngine::new();

    let a_before = result.ledger.remaining("A");
    let b_before = result.ledger.remaining("B");

    // 撤销 → 无操作 × 2 → 恢复
    engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#1",
            FulfillmentStatus::NotFulfillable,
        )
        .unwrap();
    assert_eq!(result.ledger.remaining("A"), Some(3));
    assert_eq!(result.ledger.remaining("B"), Some(1));

    let noop = engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#1",
            FulfillmentStatus::NotFulfillable,
        )
        .unwrap();
    assert_eq!(noop, ToggleOutcome::NoChange);

    engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#1",
            FulfillmentStatus::Fulfillable,
        )
        .unwrap();

    assert_eq!(result.ledger.remaining("A"), a_before);
    assert_eq!(result.ledger.remaining("B"), b_before);
}

#[test]
fn test_force_fulfill_rejected_order_after_freeing_stock() {
    let mut result = analyzed();
    let engine = ToggleEngine::new();

    // #2 (A×3) 在 A 余 0 时强制履约 → 拒绝
    let err = engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#2",
            FulfillmentStatus::Fulfillable,
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock { .. }));
    assert_eq!(
        result.records.order_status("#2"),
        Some(FulfillmentStatus::NotFulfillable)
    );

    // 撤销 #1 释放 A×3 后重试 → 成功
    engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#1",
            FulfillmentStatus::NotFulfillable,
        )
        .unwrap();
    engine
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#2",
            FulfillmentStatus::Fulfillable,
        )
        .unwrap();
    assert_eq!(
        result.records.order_status("#2"),
        Some(FulfillmentStatus::Fulfillable)
    );
    assert_eq!(result.ledger.remaining("A"), Some(0));
}

#[test]
fn test_order_status_stays_uniform_across_lines() {
    let mut result = analyzed();
    ToggleEngine::new()
        .toggle(
            &mut result.records,
            &mut result.ledger,
            "#1",
            FulfillmentStatus::NotFulfillable,
        )
        .unwrap();
    for idx in result.records.order_line_indices("#1") {
        assert_eq!(
            result.records.lines()[idx].fulfillment_status,
            FulfillmentStatus::NotFulfillable
        );
    }
}
