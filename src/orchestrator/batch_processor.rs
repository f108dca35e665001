//! 批量试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量试卷的处理和输出。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建日志文件、编译处理流程、清空 warn.txt
//! 2. **批量加载**：扫描抽取结果目录中的所有试卷
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将试卷分批次处理，每批完成后再开始下一批
//! 5. **输出**：按发现顺序汇总记录，写入数据集、统计和 warn.txt

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::loaders::{discover_papers, PaperSource};
use crate::models::question::DatasetRecord;
use crate::models::stats::{DatasetStats, PaperOutcome};
use crate::orchestrator::paper_processor;
use crate::services::{DatasetWriter, WarnWriter};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_papers_loaded, log_startup,
    print_final_stats,
};
use crate::workflow::{PaperFlow, PaperResult};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<PaperFlow>,
    warn_writer: WarnWriter,
    dataset_writer: DatasetWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_papers, &config.extraction_output_dir);

        let flow = Arc::new(PaperFlow::new(&config)?);

        let warn_writer = WarnWriter::with_path(&config.warn_file);
        warn_writer.reset().await?;

        let dataset_writer = DatasetWriter::from_config(&config);

        Ok(Self {
            config,
            flow,
            warn_writer,
            dataset_writer,
        })
    }

    /// 运行应用主逻辑
    ///
    /// # 返回
    /// 没有找到试卷时返回 `None`，不写任何输出
    pub async fn run(&self) -> Result<Option<DatasetStats>> {
        // 加载所有待处理的试卷
        let all_papers = self.load_papers().await?;

        if all_papers.is_empty() {
            warn!("⚠️ 没有找到待处理的试卷，程序结束");
            return Ok(None);
        }

        log_papers_loaded(all_papers.len(), self.batch_size());

        // 处理所有试卷
        let (records, outcomes) = self.process_all_papers(all_papers).await?;
        let failed = outcomes.iter().filter(|o| !o.is_processed()).count();

        // 写入输出
        self.dataset_writer.write_dataset(&records)?;
        let stats = DatasetStats::summarize(&records, outcomes);
        self.dataset_writer.write_stats(&stats)?;

        // 输出最终统计
        print_final_stats(&stats, failed, &self.config.output_log_file);

        Ok(Some(stats))
    }

    /// 加载试卷
    async fn load_papers(&self) -> Result<Vec<PaperSource>> {
        info!("📁 正在扫描待处理的试卷...");
        discover_papers(
            &self.config.extraction_output_dir,
            &self.config.extraction_file_name,
            &self.config.paper_dir_prefix,
        )
        .await
    }

    fn batch_size(&self) -> usize {
        self.config.max_concurrent_papers.max(1)
    }

    /// 处理所有试卷
    async fn process_all_papers(
        &self,
        all_papers: Vec<PaperSource>,
    ) -> Result<(Vec<DatasetRecord>, Vec<PaperOutcome>)> {
        let batch_size = self.batch_size();
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_papers = all_papers.len();
        let total_batches = total_papers.div_ceil(batch_size);

        let mut records = Vec::new();
        let mut outcomes = Vec::with_capacity(total_papers);

        // 分批处理
        for (batch_idx, batch_papers) in all_papers.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch_papers.len(),
                total_papers,
            );

            let batch_results = self
                .process_batch(batch_papers, batch_start, semaphore.clone())
                .await?;

            let mut success = 0;
            for (source, result) in batch_papers.iter().zip(batch_results) {
                let outcome = self.collect_result(source, result, &mut records).await?;
                if outcome.is_processed() {
                    success += 1;
                }
                outcomes.push(outcome);
            }

            log_batch_complete(batch_num, success, batch_papers.len());
        }

        Ok((records, outcomes))
    }

    /// 处理单个批次，结果顺序与输入一致
    async fn process_batch(
        &self,
        batch_papers: &[PaperSource],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<Vec<Result<PaperResult>>> {
        let mut batch_handles = Vec::with_capacity(batch_papers.len());

        // 为本批创建并发任务
        for (idx, source) in batch_papers.iter().enumerate() {
            let paper_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = self.flow.clone();
            let source = source.clone();
            let expected = self.config.expected_questions_per_paper;

            batch_handles.push(tokio::spawn(async move {
                let _permit = permit;
                paper_processor::process_paper(flow, source, paper_index, expected).await
            }));
        }

        // 等待本批所有任务完成
        let results = join_all(batch_handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(anyhow::anyhow!("任务执行失败: {}", e))))
            .collect();

        Ok(results)
    }

    /// 汇总单卷结果，并把丢弃的题目写入 warn.txt
    async fn collect_result(
        &self,
        source: &PaperSource,
        result: Result<PaperResult>,
        records: &mut Vec<DatasetRecord>,
    ) -> Result<PaperOutcome> {
        match result {
            Ok(paper) => {
                self.warn_writer
                    .write(&source.folder_name, &paper.dropped)
                    .await?;
                records.extend(paper.records);
                Ok(PaperOutcome::Processed(paper.stats))
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!("❌ 试卷 {} 处理失败: {}", source.folder_name, message);
                self.warn_writer
                    .write_paper_error(&source.folder_name, &message)
                    .await?;
                Ok(PaperOutcome::Failed {
                    paper_id: source.folder_name.clone(),
                    error: message,
                })
            }
        }
    }
}
