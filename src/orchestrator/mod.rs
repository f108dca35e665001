//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量试卷处理器
//! - 扫描抽取结果目录（Vec<PaperSource>）
//! - 控制并发数量（Semaphore）
//! - 写入数据集、统计和 warn.txt
//!
//! ### `paper_processor` - 单个试卷处理器
//! - 加载单份试卷的抽取结果
//! - 在阻塞线程池中运行 PaperFlow
//! - 对比题目数
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PaperSource>)
//!     ↓
//! paper_processor (处理单份试卷)
//!     ↓
//! workflow::PaperFlow (解析 → 规范化 → 答案 → 过滤)
//!     ↓
//! services (能力层：parser / normalizer / answer_key / filter / writers)
//! ```

pub mod batch_processor;
pub mod paper_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use paper_processor::process_paper;
