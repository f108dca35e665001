use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::paper::PaperMeta;
use crate::models::question::{DatasetRecord, QuestionType};

/// 题目被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    #[error("题目依赖图片")]
    FigureDependent,
    #[error("缺少答案")]
    MissingAnswer,
    #[error("选项不完整")]
    BadOptions,
    #[error("答案不在 1-4 范围内")]
    AnswerOutOfRange,
}

/// 单卷统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperStats {
    pub paper_id: String,
    pub year: u16,
    pub date: String,
    pub shift: u8,
    /// 解析出的题目数
    pub parsed: usize,
    /// 抽取到的答案数
    pub answers: usize,
    pub mcq: usize,
    pub integer: usize,
    /// 保留下来的题目数
    pub total: usize,
    #[serde(default)]
    pub dropped: BTreeMap<DropReason, usize>,
}

impl PaperStats {
    pub fn new(meta: &PaperMeta) -> Self {
        Self {
            paper_id: meta.paper_id.clone(),
            year: meta.year,
            date: meta.date.clone(),
            shift: meta.shift,
            ..Default::default()
        }
    }

    pub fn record_kept(&mut self, question_type: QuestionType) {
        match question_type {
            QuestionType::Mcq => self.mcq += 1,
            QuestionType::Integer => self.integer += 1,
        }
        self.total += 1;
    }

    pub fn record_dropped(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// 统计文件中每份试卷的条目：成功时为统计，失败时为错误信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaperOutcome {
    Processed(PaperStats),
    Failed { paper_id: String, error: String },
}

impl PaperOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, PaperOutcome::Processed(_))
    }
}

/// `extraction_stats.json` 的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub generated_at: String,
    pub total_papers: usize,
    pub total_questions: usize,
    pub mcq_count: usize,
    pub integer_count: usize,
    pub papers: Vec<PaperOutcome>,
}

impl DatasetStats {
    /// 根据全部数据集记录和每卷结果汇总
    pub fn summarize(records: &[DatasetRecord], papers: Vec<PaperOutcome>) -> Self {
        let mcq_count = records
            .iter()
            .filter(|r| r.question_type == QuestionType::Mcq)
            .count();

        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            total_papers: papers.len(),
            total_questions: records.len(),
            mcq_count,
            integer_count: records.len() - mcq_count,
            papers,
        }
    }
}
