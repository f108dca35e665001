//! 文本片段模型
//!
//! 上游 PDF 抽取工具输出的 `text_blocks` 在这里被统一成一种形状，
//! 解析器只接触规范化之后的 [`TextFragment`]。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{AppResult, DataError};

/// 一个带顺序号的文本片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFragment {
    /// 所在页码（上游可能缺失）
    pub page: Option<i32>,
    /// 片段文本
    pub text: String,
    /// 在上游输出序列中的位置
    pub order_index: usize,
}

impl TextFragment {
    pub fn new(page: Option<i32>, text: impl Into<String>, order_index: usize) -> Self {
        Self {
            page,
            text: text.into(),
            order_index,
        }
    }

    /// 由纯文本列表构造片段序列（页码统一为 `page`）
    pub fn from_texts<S: AsRef<str>>(texts: &[S], page: Option<i32>) -> Vec<Self> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, t)| Self::new(page, t.as_ref(), idx))
            .collect()
    }
}

/// `text` 字段的两种形状：裸字符串，或带坐标等附加信息的对象
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FragmentText {
    Plain(String),
    Annotated {
        #[serde(default)]
        text: String,
        #[serde(flatten)]
        extra: Map<String, JsonValue>,
    },
    /// 无法识别的形状，按空文本处理
    Unknown(JsonValue),
}

impl FragmentText {
    pub fn as_str(&self) -> &str {
        match self {
            FragmentText::Plain(text) => text,
            FragmentText::Annotated { text, .. } => text,
            FragmentText::Unknown(_) => "",
        }
    }
}

/// 抽取结果中的原始文本块
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTextBlock {
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub text: Option<FragmentText>,
}

/// `01_text_images_extraction.json` 文件结构（只保留本流程需要的字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionFile {
    #[serde(default)]
    pub paper_id: Option<String>,
    pub text_blocks: Vec<RawTextBlock>,
}

impl ExtractionFile {
    /// 从 JSON 字符串解析抽取结果
    ///
    /// 顶层必须是带 `text_blocks` 数组的对象，否则视为调用方的形状错误。
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let value: JsonValue = serde_json::from_str(content)
            .map_err(|source| DataError::InvalidExtraction { source })?;

        if !value
            .get("text_blocks")
            .map(JsonValue::is_array)
            .unwrap_or(false)
        {
            return Err(DataError::MissingTextBlocks.into());
        }

        let file = serde_json::from_value(value)
            .map_err(|source| DataError::InvalidExtraction { source })?;
        Ok(file)
    }

    /// 转换为规范化的片段序列
    ///
    /// 缺失或无法识别的 `text` 变成空文本片段，保证 `order_index` 与原始位置一致。
    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.text_blocks
            .into_iter()
            .enumerate()
            .map(|(idx, block)| {
                let text = match &block.text {
                    Some(FragmentText::Unknown(v)) => {
                        debug!("文本块 {} 的 text 字段形状无法识别: {}", idx, v);
                        String::new()
                    }
                    Some(t) => t.as_str().to_string(),
                    None => String::new(),
                };
                TextFragment::new(block.page, text, idx)
            })
            .collect()
    }
}

/// 将片段文本按顺序拼接（用换行分隔，跳过空文本），供答案抽取使用
pub fn combined_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_text_shapes_are_unwrapped() {
        let json = r#"{
            "paper_id": "JEE Main 2024 (01 Feb Shift 1)",
            "text_blocks": [
                {"page": 1, "text": "Q1."},
                {"page": 1, "text": {"text": "What is 2+2", "block_type": "text", "coordinates": {"x0": 1.0}}},
                {"page": 2, "text": 42},
                {"text": null}
            ]
        }"#;

        let file = ExtractionFile::from_json_str(json).unwrap();
        assert_eq!(file.paper_id.as_deref(), Some("JEE Main 2024 (01 Feb Shift 1)"));

        let fragments = file.into_fragments();
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0].text, "Q1.");
        assert_eq!(fragments[1].text, "What is 2+2");
        assert_eq!(fragments[2].text, "");
        assert_eq!(fragments[2].page, Some(2));
        assert_eq!(fragments[3].page, None);
        assert_eq!(fragments[3].order_index, 3);
    }

    #[test]
    fn test_missing_text_blocks_is_shape_error() {
        let err = ExtractionFile::from_json_str(r#"{"paper_id": "x"}"#).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Data(DataError::MissingTextBlocks)
        ));

        let err = ExtractionFile::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Data(DataError::MissingTextBlocks)
        ));
    }

    #[test]
    fn test_combined_text_skips_empty() {
        let fragments = TextFragment::from_texts(&["Q1. (2)", "", "Q2. (3)"], Some(5));
        assert_eq!(combined_text(&fragments), "Q1. (2)\nQ2. (3)");
    }
}
