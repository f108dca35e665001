//! 单个试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个试卷，是试卷级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **加载**：读取试卷目录中的抽取结果 JSON
//! 2. **元数据**：从目录名解析年份、日期、场次
//! 3. **流程调度**：在阻塞线程池中运行 `PaperFlow`
//! 4. **统计输出**：对比解析出的题目数与期望题目数

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::loaders::{load_extraction_file, PaperSource};
use crate::models::paper::PaperMeta;
use crate::workflow::{PaperCtx, PaperFlow, PaperResult};

/// 处理单个试卷
///
/// # 参数
/// - `flow`: 共享的试卷处理流程
/// - `source`: 试卷目录和抽取结果路径
/// - `paper_index`: 试卷索引（用于日志）
/// - `expected_questions`: 每卷期望的题目数
///
/// # 返回
/// 返回本卷的记录、丢弃题目和统计
pub async fn process_paper(
    flow: Arc<PaperFlow>,
    source: PaperSource,
    paper_index: usize,
    expected_questions: Option<usize>,
) -> Result<PaperResult> {
    let meta = PaperMeta::from_folder_name(&source.folder_name);
    log_paper_start(paper_index, &meta);

    let extraction = load_extraction_file(&source.extraction_path).await?;
    let fragments = extraction.into_fragments();
    info!("[试卷 {}] 读取到 {} 个文本块", paper_index, fragments.len());

    let ctx = PaperCtx::new(meta, paper_index, expected_questions);
    let result = tokio::task::spawn_blocking(move || flow.run(&ctx, &fragments))
        .await
        .with_context(|| format!("试卷任务异常退出: {}", source.folder_name))??;

    log_question_count(paper_index, result.stats.parsed, expected_questions);
    info!("[试卷 {}] ✅ 试卷处理完成", paper_index);

    Ok(result)
}

// ========== 日志辅助函数 ==========

fn log_paper_start(paper_index: usize, meta: &PaperMeta) {
    info!("[试卷 {}] 开始处理", paper_index);
    info!("[试卷 {}] 名称: {}", paper_index, meta.paper_id);
    info!(
        "[试卷 {}] 年份: {}, 日期: {}, 场次: {}",
        paper_index, meta.year, meta.date, meta.shift
    );
}

fn log_question_count(paper_index: usize, parsed: usize, expected: Option<usize>) {
    match expected {
        Some(expected) if parsed != expected => warn!(
            "[试卷 {}] ⚠️ 解析出 {} 道题目，期望 {} 道",
            paper_index, parsed, expected
        ),
        Some(expected) => info!("[试卷 {}] ✓ 题目数与期望一致: {}", paper_index, expected),
        None => info!("[试卷 {}] 解析出 {} 道题目", paper_index, parsed),
    }
}
