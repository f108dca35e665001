//! 试卷处理上下文
//!
//! 封装"我正在处理第几份试卷、它是哪一场考试"这一信息

use std::fmt::Display;

use crate::models::paper::PaperMeta;

/// 试卷处理上下文
#[derive(Debug, Clone)]
pub struct PaperCtx {
    /// 试卷元数据（paper_id 即目录名）
    pub meta: PaperMeta,

    /// 试卷索引（仅用于日志显示，从 1 开始）
    pub paper_index: usize,

    /// 每卷期望的题目数
    pub expected_questions: Option<usize>,
}

impl PaperCtx {
    /// 创建新的试卷上下文
    pub fn new(meta: PaperMeta, paper_index: usize, expected_questions: Option<usize>) -> Self {
        Self {
            meta,
            paper_index,
            expected_questions,
        }
    }

    pub fn paper_id(&self) -> &str {
        &self.meta.paper_id
    }
}

impl Display for PaperCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[试卷 {}]", self.paper_index)
    }
}
