use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ConfigError};
use crate::services::question_parser::{DuplicateLabelPolicy, ParserOptions};

/// 默认配置文件路径，可通过 `CONFIG_FILE` 覆盖
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 抽取结果根目录（每份试卷一个子目录）
    pub extraction_output_dir: String,
    /// 每个试卷目录中的抽取结果文件名
    pub extraction_file_name: String,
    /// 试卷目录名前缀
    pub paper_dir_prefix: String,
    /// 数据集输出目录
    pub output_dir: String,
    pub dataset_file_name: String,
    pub stats_file_name: String,
    /// 被丢弃题目的记录文件
    pub warn_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 同时处理的试卷数量
    pub max_concurrent_papers: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 每卷期望的题目数，仅用于日志对比
    pub expected_questions_per_paper: Option<usize>,
    // --- 解析配置 ---
    pub duplicate_labels: DuplicateLabelPolicy,
    pub bare_number_labels: bool,
    // --- 过滤配置 ---
    pub junk_substrings: Vec<String>,
    pub figure_hints: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction_output_dir: "extraction_output".to_string(),
            extraction_file_name: "01_text_images_extraction.json".to_string(),
            paper_dir_prefix: "JEE Main".to_string(),
            output_dir: "dataset_v2".to_string(),
            dataset_file_name: "all_papers_clean.jsonl".to_string(),
            stats_file_name: "extraction_stats.json".to_string(),
            warn_file: "warn.txt".to_string(),
            output_log_file: "output.txt".to_string(),
            max_concurrent_papers: 4,
            verbose_logging: false,
            expected_questions_per_paper: Some(90),
            duplicate_labels: DuplicateLabelPolicy::LastWins,
            bare_number_labels: false,
            junk_substrings: to_strings(&[
                "JEE Main 2024",
                "JEE Main 2025",
                "MathonGo",
                "https://",
                "www.",
            ]),
            figure_hints: to_strings(&[
                "in the figure",
                "in figure",
                "in the following figure",
                "in the diagram",
                "shown in figure",
                "shown in the figure",
                "circuit diagram",
                "given circuit",
                "the circuit shown",
                "as shown",
                "figure shows",
                "diagram shows",
            ]),
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取可选的 TOML 配置文件，再应用环境变量覆盖
    ///
    /// 配置文件不存在时使用默认值；存在但无法解析时返回错误。
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if Path::new(&path).exists() {
            Ok(Self::from_toml_file(&path)?.with_env_overrides())
        } else {
            debug!("未找到配置文件 {}，使用默认配置", path);
            Ok(Self::from_env())
        }
    }

    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 应用环境变量覆盖；无法解析的值保留原值
    pub fn with_env_overrides(self) -> Self {
        Self {
            extraction_output_dir: env_or("EXTRACTION_OUTPUT_DIR", self.extraction_output_dir),
            extraction_file_name: env_or("EXTRACTION_FILE_NAME", self.extraction_file_name),
            paper_dir_prefix: env_or("PAPER_DIR_PREFIX", self.paper_dir_prefix),
            output_dir: env_or("OUTPUT_DIR", self.output_dir),
            dataset_file_name: env_or("DATASET_FILE_NAME", self.dataset_file_name),
            stats_file_name: env_or("STATS_FILE_NAME", self.stats_file_name),
            warn_file: env_or("WARN_FILE", self.warn_file),
            output_log_file: env_or("OUTPUT_LOG_FILE", self.output_log_file),
            max_concurrent_papers: env_or("MAX_CONCURRENT_PAPERS", self.max_concurrent_papers)
                .max(1),
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging),
            expected_questions_per_paper: match std::env::var("EXPECTED_QUESTIONS_PER_PAPER") {
                Ok(v) if v.trim().is_empty() || v.trim() == "none" => None,
                Ok(v) => v.trim().parse().ok().or(self.expected_questions_per_paper),
                Err(_) => self.expected_questions_per_paper,
            },
            duplicate_labels: std::env::var("DUPLICATE_LABELS")
                .ok()
                .and_then(|v| DuplicateLabelPolicy::from_name(&v))
                .unwrap_or(self.duplicate_labels),
            bare_number_labels: env_or("BARE_NUMBER_LABELS", self.bare_number_labels),
            junk_substrings: env_list("JUNK_SUBSTRINGS").unwrap_or(self.junk_substrings),
            figure_hints: env_list("FIGURE_HINTS").unwrap_or(self.figure_hints),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_papers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_papers".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.extraction_file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "extraction_file_name".to_string(),
                value: self.extraction_file_name.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// 题目解析器选项
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            duplicate_labels: self.duplicate_labels,
            bare_number_labels: self.bare_number_labels,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("环境变量 {}='{}' 无法解析，使用原值", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// 逗号分隔的列表
fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_concurrent_papers, 4);
        assert_eq!(config.expected_questions_per_paper, Some(90));
        assert_eq!(config.junk_substrings.len(), 5);
        assert_eq!(config.figure_hints.len(), 12);
        assert_eq!(config.parser_options(), ParserOptions::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            output_dir = "out"
            max_concurrent_papers = 2
            duplicate_labels = "first_wins"
            figure_hints = ["see figure"]
            "#,
            "pipeline.toml",
        )
        .unwrap();

        assert_eq!(config.output_dir, "out");
        assert_eq!(config.max_concurrent_papers, 2);
        assert_eq!(config.duplicate_labels, DuplicateLabelPolicy::FirstWins);
        assert_eq!(config.figure_hints, vec!["see figure"]);
        assert_eq!(config.dataset_file_name, "all_papers_clean.jsonl");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("max_concurrent_papers = \"many\"", "bad.toml").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::TomlParseFailed { .. })
        ));

        let err = Config::from_toml_str("max_concurrent_papers = 0", "zero.toml").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_toml_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "bare_number_labels = true\n").unwrap();

        let config = Config::from_toml_file(path.to_str().unwrap()).unwrap();
        assert!(config.bare_number_labels);

        assert!(Config::from_toml_file("/definitely/not/here.toml").is_err());
    }
}
