use crate::error::AppError;
use crate::models::fragment::ExtractionFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一份待处理的试卷（对应抽取输出目录下的一个子目录）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSource {
    /// 目录名，同时作为 paper_id
    pub folder_name: String,
    /// 抽取结果 JSON 文件路径
    pub extraction_path: PathBuf,
}

/// 从 JSON 文件加载抽取结果
pub async fn load_extraction_file(json_file_path: &Path) -> Result<ExtractionFile> {
    let content = fs::read_to_string(json_file_path)
        .await
        .with_context(|| format!("无法读取抽取结果: {}", json_file_path.display()))?;

    let file = ExtractionFile::from_json_str(&content)
        .with_context(|| format!("无法解析抽取结果: {}", json_file_path.display()))?;

    Ok(file)
}

/// 扫描抽取输出目录，找到所有带抽取结果文件的试卷目录
///
/// # 参数
/// - `folder_path`: 抽取输出根目录
/// - `file_name`: 每个试卷目录中的抽取结果文件名
/// - `prefix`: 试卷目录名前缀（为空则不过滤）
///
/// # 返回
/// 按目录名排序的试卷列表
pub async fn discover_papers(
    folder_path: &str,
    file_name: &str,
    prefix: &str,
) -> Result<Vec<PaperSource>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::directory_not_found(folder_path).into());
    }

    let mut papers = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let folder_name = entry.file_name().to_string_lossy().to_string();
        if !prefix.is_empty() && !folder_name.starts_with(prefix) {
            continue;
        }

        let extraction_path = path.join(file_name);
        if extraction_path.exists() {
            papers.push(PaperSource {
                folder_name,
                extraction_path,
            });
        } else {
            tracing::debug!("跳过没有抽取结果的目录: {}", path.display());
        }
    }

    papers.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
    tracing::info!("在 {} 中找到 {} 份试卷", folder_path, papers.len());

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discover_papers_filters_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        let file_name = "01_text_images_extraction.json";

        for name in ["JEE Main 2024 (27 Jan Shift 2)", "JEE Main 2024 (01 Feb Shift 1)"] {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join(file_name), r#"{"text_blocks": []}"#).unwrap();
        }
        // 没有抽取结果
        std::fs::create_dir(root.path().join("JEE Main 2025 (22 Jan Shift 1)")).unwrap();
        // 前缀不匹配
        let other = root.path().join("notes");
        std::fs::create_dir(&other).unwrap();
        std::fs::write(other.join(file_name), "{}").unwrap();

        let papers = discover_papers(root.path().to_str().unwrap(), file_name, "JEE Main")
            .await
            .unwrap();

        let names: Vec<_> = papers.iter().map(|p| p.folder_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["JEE Main 2024 (01 Feb Shift 1)", "JEE Main 2024 (27 Jan Shift 2)"]
        );
    }

    #[tokio::test]
    async fn test_discover_papers_missing_root() {
        let err = discover_papers("/definitely/not/here", "x.json", "")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::File(crate::error::FileError::DirectoryNotFound { path }))
                if path == "/definitely/not/here"
        ));
    }
}
