//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::services::record_filter::DroppedQuestion;
use crate::utils::logging::truncate_text;

/// 题干预览的最大字符数
const STEM_PREVIEW_CHARS: usize = 80;

/// 警告写入服务
///
/// 职责：
/// - 将被丢弃的题目追加写入 warn.txt
/// - 一次写入一份试卷的全部丢弃记录
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 清空警告文件
    pub async fn reset(&self) -> Result<()> {
        tokio::fs::write(&self.warn_file_path, "")
            .await
            .with_context(|| format!("无法清空警告文件: {}", self.warn_file_path))
    }

    /// 写入一份试卷的丢弃记录
    ///
    /// # 参数
    /// - `paper_id`: 试卷ID
    /// - `dropped`: 被丢弃的题目
    pub async fn write(&self, paper_id: &str, dropped: &[DroppedQuestion]) -> Result<()> {
        if dropped.is_empty() {
            return Ok(());
        }

        debug!("写入警告: 试卷 {} | {} 道题目", paper_id, dropped.len());

        let warn_msg: String = dropped
            .iter()
            .map(|d| format_line(paper_id, d))
            .collect();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .with_context(|| format!("无法打开警告文件: {}", self.warn_file_path))?;

        file.write_all(warn_msg.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// 写入一份处理失败的试卷
    pub async fn write_paper_error(&self, paper_id: &str, error: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .with_context(|| format!("无法打开警告文件: {}", self.warn_file_path))?;

        file.write_all(format!("试卷 {} | 处理失败: {}\n", paper_id, error).as_bytes())
            .await?;
        file.flush().await?;

        Ok(())
    }
}

fn format_line(paper_id: &str, dropped: &DroppedQuestion) -> String {
    format!(
        "试卷 {} | 题目 {} | 原因: {} | 题干: {}\n",
        paper_id,
        dropped.question_number,
        dropped.reason,
        truncate_text(&dropped.stem.replace('\n', " "), STEM_PREVIEW_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::DropReason;

    #[tokio::test]
    async fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy());

        let dropped = vec![
            DroppedQuestion {
                question_number: 3,
                reason: DropReason::MissingAnswer,
                stem: "Find\nthe value".to_string(),
            },
            DroppedQuestion {
                question_number: 8,
                reason: DropReason::FigureDependent,
                stem: "x".repeat(200),
            },
        ];

        writer.write("paper-a", &dropped).await.unwrap();
        writer.write("paper-b", &[]).await.unwrap();
        writer.write_paper_error("paper-c", "bad json").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "试卷 paper-a | 题目 3 | 原因: 缺少答案 | 题干: Find the value");
        assert!(lines[1].ends_with("..."));
        assert!(lines[2].contains("paper-c"));

        writer.reset().await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }
}
