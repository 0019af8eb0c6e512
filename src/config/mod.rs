// ==========================================
// 订单履约分析系统 - 配置层
// ==========================================
// 职责: 运行配置对象 (规则列表/低库存阈值/回看策略)
// 红线: 核心引擎不读文件不读环境, 配置由调用方解析后注入
// ==========================================

pub mod analysis_profile;

pub use analysis_profile::AnalysisProfile;
