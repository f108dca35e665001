//! 记录过滤服务 - 业务能力层
//!
//! 只负责"一道规范化后的题目能否进入数据集"能力：
//! 去掉页脚水印、识别依赖图片的题目、判断题型并挂上答案。

use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::models::answer::{parse_mcq_index, AnswerMap};
use crate::models::paper::PaperMeta;
use crate::models::question::{CorrectAnswer, DatasetRecord, NormalizedQuestion, QuestionType};
use crate::models::stats::DropReason;

/// 整数题的填空标记
const INTEGER_BLANK: &str = "_____";

/// 判断复杂公式时使用的记号
const MATH_TOKENS: [&str; 10] = [
    "sin", "cos", "tan", "cot", "sec", "cosec", "π", "^", "theta", "θ",
];

/// 被丢弃的题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedQuestion {
    pub question_number: u32,
    pub reason: DropReason,
    /// 去掉水印后的题干
    pub stem: String,
}

impl fmt::Display for DroppedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "题目 {} ({})", self.question_number, self.reason)
    }
}

/// 记录过滤器
#[derive(Debug, Clone)]
pub struct RecordFilter {
    /// 已转为小写
    junk_substrings: Vec<String>,
    /// 已转为小写
    figure_hints: Vec<String>,
}

impl RecordFilter {
    pub fn new(junk_substrings: &[String], figure_hints: &[String]) -> Self {
        Self {
            junk_substrings: lowercase_all(junk_substrings),
            figure_hints: lowercase_all(figure_hints),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.junk_substrings, &config.figure_hints)
    }

    /// 在第一个水印处截断文本（不区分大小写）
    pub fn strip_junk(&self, text: &str) -> String {
        let mut cleaned = text;
        for junk in &self.junk_substrings {
            if junk.is_empty() {
                continue;
            }
            // ASCII 小写不改变字节长度，下标可以直接用于原文
            if let Some(idx) = cleaned.to_ascii_lowercase().find(junk.as_str()) {
                cleaned = cleaned[..idx].trim_end();
            }
        }
        cleaned.to_string()
    }

    /// 题干是否引用了缺失的图
    pub fn looks_image_dependent(&self, stem: &str) -> bool {
        let lowered = stem.to_lowercase();
        self.figure_hints
            .iter()
            .any(|hint| !hint.is_empty() && lowered.contains(hint.as_str()))
    }

    /// 把规范化后的题目转换为数据集记录
    ///
    /// # 参数
    /// - `meta`: 试卷元数据
    /// - `question`: 规范化后的题目
    /// - `answers`: 本卷答案表
    ///
    /// # 返回
    /// 可以保留时返回记录，否则返回丢弃原因
    pub fn build_record(
        &self,
        meta: &PaperMeta,
        question: &NormalizedQuestion,
        answers: &AnswerMap,
    ) -> Result<DatasetRecord, DroppedQuestion> {
        let stem = self.strip_junk(&question.question_text);
        let options: Vec<String> = question.options.iter().map(|o| self.strip_junk(o)).collect();

        let rejected = |reason: DropReason| {
            debug!("丢弃题目 {}: {}", question.question_number, reason);
            DroppedQuestion {
                question_number: question.question_number,
                reason,
                stem: stem.clone(),
            }
        };

        if self.looks_image_dependent(&stem) {
            return Err(rejected(DropReason::FigureDependent));
        }

        let answer = answers.get(&question.question_number);

        let (question_type, correct_index, correct_answer) = if is_integer_type(&stem) {
            let answer = answer.ok_or_else(|| rejected(DropReason::MissingAnswer))?;
            (QuestionType::Integer, None, Some(CorrectAnswer::from_raw(answer)))
        } else {
            if !has_good_options(&options) {
                return Err(rejected(DropReason::BadOptions));
            }
            let answer = answer.ok_or_else(|| rejected(DropReason::MissingAnswer))?;
            let index = parse_mcq_index(answer).ok_or_else(|| rejected(DropReason::AnswerOutOfRange))?;
            (QuestionType::Mcq, Some(index), None)
        };

        let complex_math = is_complex_math(&stem, &options);

        Ok(DatasetRecord {
            paper_id: meta.paper_id.clone(),
            year: meta.year,
            date: meta.date.clone(),
            shift: meta.shift,
            question_number: question.question_number,
            page_start: question.page_start,
            page_end: question.page_end,
            question_text: stem,
            options,
            question_type,
            correct_index,
            correct_answer,
            complex_math,
        })
    }
}

/// 题干含有填空横线即为整数题
pub fn is_integer_type(stem: &str) -> bool {
    stem.contains(INTEGER_BLANK)
}

fn has_good_options(options: &[String]) -> bool {
    options.len() == 4 && options.iter().all(|o| !o.trim().is_empty())
}

/// 题干或任一选项（至少 10 个字符）含有三角函数、π、指数等记号
pub fn is_complex_math(stem: &str, options: &[String]) -> bool {
    std::iter::once(stem)
        .chain(options.iter().map(String::as_str))
        .map(str::trim)
        .filter(|s| s.chars().count() >= 10)
        .any(|s| {
            let lowered = s.to_lowercase();
            MATH_TOKENS.iter().any(|tok| lowered.contains(tok))
        })
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}
