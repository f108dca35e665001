//! 试卷处理流程 - 流程层
//!
//! 核心职责：定义"一份试卷"的完整处理流程
//!
//! 流程顺序：
//! 1. 片段 → 题目解析
//! 2. 整卷文本 → 答案表
//! 3. 每道题：规范化 → 去水印 → 挂答案 → 过滤
//!
//! 只做 CPU 计算，不读写文件。

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::fragment::TextFragment;
use crate::models::question::DatasetRecord;
use crate::models::stats::PaperStats;
use crate::services::answer_key::{validate_answers, AnswerKeyExtractor};
use crate::services::question_parser::{MarkerBasedQuestionParser, ParserOptions};
use crate::services::record_filter::{DroppedQuestion, RecordFilter};
use crate::services::text_normalizer::TextNormalizer;
use crate::utils::logging::truncate_text;
use crate::workflow::paper_ctx::PaperCtx;

/// 一份试卷的处理结果
#[derive(Debug, Clone)]
pub struct PaperResult {
    /// 保留下来的记录，按题目出现顺序
    pub records: Vec<DatasetRecord>,
    pub dropped: Vec<DroppedQuestion>,
    pub stats: PaperStats,
}

/// 试卷处理流程
///
/// - 持有所有无状态的能力（规范化、答案抽取、过滤）
/// - 可在多个任务间共享
pub struct PaperFlow {
    normalizer: TextNormalizer,
    answer_extractor: AnswerKeyExtractor,
    record_filter: RecordFilter,
    parser_options: ParserOptions,
    verbose_logging: bool,
}

impl PaperFlow {
    /// 创建新的试卷处理流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            answer_extractor: AnswerKeyExtractor::new()?,
            record_filter: RecordFilter::from_config(config),
            parser_options: config.parser_options(),
            verbose_logging: config.verbose_logging,
        })
    }

    pub fn run(&self, ctx: &PaperCtx, fragments: &[TextFragment]) -> AppResult<PaperResult> {
        let mut stats = PaperStats::new(&ctx.meta);

        // ========== 步骤 1: 解析题目 ==========
        let parser =
            MarkerBasedQuestionParser::with_options(ctx.paper_id(), self.parser_options)?;
        let questions = parser.parse(fragments);
        stats.parsed = questions.len();
        info!("{} 解析得到 {} 道题目", ctx, questions.len());

        // ========== 步骤 2: 抽取答案 ==========
        let answers = self.answer_extractor.extract_from_fragments(fragments);
        stats.answers = answers.len();
        if answers.is_empty() {
            warn!("{} ⚠️ 未抽取到答案，所有题目都将被丢弃", ctx);
        } else if !validate_answers(&answers, ctx.expected_questions) {
            warn!("{} ⚠️ 答案表中存在非整数答案", ctx);
        }

        // ========== 步骤 3: 逐题规范化与过滤 ==========
        let mut records = Vec::with_capacity(questions.len());
        let mut dropped = Vec::new();

        for question in &questions {
            let normalized = self.normalizer.normalize_question(question);

            if self.verbose_logging {
                debug!(
                    "{} Q{}: {}",
                    ctx,
                    normalized.question_number,
                    truncate_text(&normalized.question_text, 60)
                );
            }

            match self
                .record_filter
                .build_record(&ctx.meta, &normalized, &answers)
            {
                Ok(record) => {
                    stats.record_kept(record.question_type);
                    records.push(record);
                }
                Err(d) => {
                    stats.record_dropped(d.reason);
                    dropped.push(d);
                }
            }
        }

        info!(
            "{} ✓ 保留 {} 道 (MCQ {}, 整数题 {})，丢弃 {} 道",
            ctx,
            stats.total,
            stats.mcq,
            stats.integer,
            dropped.len()
        );

        Ok(PaperResult {
            records,
            dropped,
            stats,
        })
    }
}
