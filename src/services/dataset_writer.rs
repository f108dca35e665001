//! 数据集写入服务 - 业务能力层
//!
//! 只负责"把记录和统计写到磁盘"能力，不关心记录从哪里来。

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult, DataError};
use crate::models::question::DatasetRecord;
use crate::models::stats::DatasetStats;

/// 数据集写入服务
pub struct DatasetWriter {
    output_dir: PathBuf,
    dataset_file_name: String,
    stats_file_name: String,
}

impl DatasetWriter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        dataset_file_name: impl Into<String>,
        stats_file_name: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            dataset_file_name: dataset_file_name.into(),
            stats_file_name: stats_file_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.output_dir,
            &config.dataset_file_name,
            &config.stats_file_name,
        )
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.output_dir.join(&self.dataset_file_name)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join(&self.stats_file_name)
    }

    /// 写入 JSONL 数据集（每行一条记录，覆盖旧文件）
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub fn write_dataset(&self, records: &[DatasetRecord]) -> AppResult<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.dataset_path();

        let file = fs::File::create(&path).map_err(|e| write_failed(&path, e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)
                .map_err(|source| DataError::SerializeFailed { source })?;
            writer.write_all(b"\n").map_err(|e| write_failed(&path, e))?;
        }
        writer.flush().map_err(|e| write_failed(&path, e))?;

        info!("✓ 数据集已写入: {} ({} 条)", path.display(), records.len());
        Ok(path)
    }

    /// 写入统计 JSON（带缩进）
    pub fn write_stats(&self, stats: &DatasetStats) -> AppResult<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.stats_path();

        let content = serde_json::to_string_pretty(stats)
            .map_err(|source| DataError::SerializeFailed { source })?;
        fs::write(&path, content).map_err(|e| write_failed(&path, e))?;

        info!("✓ 统计已写入: {}", path.display());
        Ok(path)
    }

    fn ensure_output_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| write_failed(&self.output_dir, e))
    }
}

fn write_failed(path: &Path, source: std::io::Error) -> AppError {
    AppError::file_write_failed(path.display().to_string(), source)
}
