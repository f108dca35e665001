//! # Question Extract
//!
//! 从试卷 PDF 的文本抽取结果中还原题目、选项和答案，生成干净的题目数据集
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - 文本片段、题目、答案表、试卷元数据、统计
//! - `models/loaders` - 读取抽取结果 JSON、扫描试卷目录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `TextNormalizer` - 数学文本规范化
//! - `AnswerKeyExtractor` - 答案表抽取
//! - `MarkerBasedQuestionParser` - 题目 / 选项解析
//! - `RecordFilter` - 去水印、题型判断、过滤
//! - `DatasetWriter` / `WarnWriter` - 输出能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份试卷"的完整处理流程
//! - `PaperCtx` - 上下文封装（元数据 + 试卷索引）
//! - `PaperFlow` - 流程编排（parse → normalize → answers → filter）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量试卷处理器，管理并发和输出
//! - `orchestrator/paper_processor` - 单个试卷处理器，加载并运行流程
//!
//! ## 模块结构

pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{DatasetRecord, NormalizedQuestion, ParsedQuestion, TextFragment};
pub use orchestrator::{process_paper, App};
pub use services::{AnswerKeyExtractor, MarkerBasedQuestionParser, TextNormalizer};
pub use workflow::{PaperCtx, PaperFlow, PaperResult};
