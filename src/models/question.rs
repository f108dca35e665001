use serde::{Deserialize, Serialize};

/// 解析器输出的题目
///
/// `options` 要么为空（整数题），要么恰好 4 个非空选项。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub paper_id: String,
    pub question_number: u32,
    pub question_text: String,
    pub options: Vec<String>,
    /// 页码范围，未知时为 -1
    pub page_start: i32,
    pub page_end: i32,
}

/// 经过文本规范化后的题目，与 [`ParsedQuestion`] 同形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    pub paper_id: String,
    pub question_number: u32,
    pub question_text: String,
    pub options: Vec<String>,
    pub page_start: i32,
    pub page_end: i32,
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// 四选一
    Mcq,
    /// 数值填空
    Integer,
}

/// 整数题的答案：能解析为整数时输出数字，否则保留原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Integer(i64),
    Text(String),
}

impl CorrectAnswer {
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map(CorrectAnswer::Integer)
            .unwrap_or_else(|_| CorrectAnswer::Text(trimmed.to_string()))
    }
}

/// 数据集中的一行（JSONL）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub paper_id: String,
    pub year: u16,
    pub date: String,
    pub shift: u8,
    pub question_number: u32,
    pub page_start: i32,
    pub page_end: i32,
    pub question_text: String,
    pub options: Vec<String>,
    pub question_type: QuestionType,
    /// MCQ 的正确选项（1-4）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correct_index: Option<u8>,
    /// 整数题的答案
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correct_answer: Option<CorrectAnswer>,
    #[serde(default)]
    pub complex_math: bool,
}
