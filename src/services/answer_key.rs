//! 答案抽取服务 - 业务能力层
//!
//! 只负责"从整卷文本中找出答案表"能力。
//!
//! 按优先级依次尝试几种格式，第一个有结果的策略胜出，不做合并：
//! 1. `Q1. (2)` 带 Q 的题号
//! 2. `1. (2)` 行首裸题号
//! 3. `(2) (3) (1) ...` 连续序列（至少 10 个才认为是答案表）

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::answer::AnswerMap;
use crate::models::fragment::{combined_text, TextFragment};

/// 序列策略最少需要的匹配数
pub const MIN_SEQUENCE_MATCHES: usize = 10;

/// 答案抽取策略
///
/// 没有任何匹配时返回 `None`，交给下一个策略。
pub trait AnswerKeyStrategy: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Option<AnswerMap>;
}

/// `Q<题号> <标点>* (<答案>)`，不区分大小写；重复题号以后出现的为准
pub struct QNumberStrategy {
    pattern: Regex,
}

impl QNumberStrategy {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)Q\s*(\d+)\s*[.)\-:]*\s*\((\d+)\)")?,
        })
    }
}

impl AnswerKeyStrategy for QNumberStrategy {
    fn name(&self) -> &'static str {
        "q_number"
    }

    fn extract(&self, text: &str) -> Option<AnswerMap> {
        let answers: AnswerMap = self
            .pattern
            .captures_iter(text)
            .filter_map(|cap| {
                let q_num = cap[1].parse::<u32>().ok()?;
                Some((q_num, cap[2].trim().to_string()))
            })
            .collect();

        (!answers.is_empty()).then_some(answers)
    }
}

/// 行首 `<题号> <标点>* (<答案>)`；题号 0 是解析残留，丢弃
pub struct BareNumberStrategy {
    pattern: Regex,
}

impl BareNumberStrategy {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?m)^\s*(\d+)\s*[.)\-:]*\s*\((\d+)\)")?,
        })
    }
}

impl AnswerKeyStrategy for BareNumberStrategy {
    fn name(&self) -> &'static str {
        "bare_number"
    }

    fn extract(&self, text: &str) -> Option<AnswerMap> {
        let answers: AnswerMap = self
            .pattern
            .captures_iter(text)
            .filter_map(|cap| {
                let q_num = cap[1].parse::<u32>().ok()?;
                if q_num == 0 {
                    return None;
                }
                Some((q_num, cap[2].trim().to_string()))
            })
            .collect();

        (!answers.is_empty()).then_some(answers)
    }
}

/// 任意位置的 `(<答案>)`，按阅读顺序编号 1, 2, 3...
pub struct SequenceStrategy {
    pattern: Regex,
    min_matches: usize,
}

impl SequenceStrategy {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(r"\((\d+)\)")?,
            min_matches: MIN_SEQUENCE_MATCHES,
        })
    }
}

impl AnswerKeyStrategy for SequenceStrategy {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn extract(&self, text: &str) -> Option<AnswerMap> {
        let matches: Vec<&str> = self
            .pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .collect();

        if matches.len() < self.min_matches {
            debug!(
                "序列策略只找到 {} 个匹配（需要至少 {} 个），视为噪声",
                matches.len(),
                self.min_matches
            );
            return None;
        }

        Some(
            matches
                .into_iter()
                .zip(1u32..)
                .map(|(answer, q_num)| (q_num, answer.trim().to_string()))
                .collect(),
        )
    }
}

/// 答案抽取器
pub struct AnswerKeyExtractor {
    strategies: Vec<Box<dyn AnswerKeyStrategy>>,
}

impl AnswerKeyExtractor {
    /// 使用默认的三种策略创建抽取器
    pub fn new() -> AppResult<Self> {
        Ok(Self::with_strategies(vec![
            Box::new(QNumberStrategy::new()?),
            Box::new(BareNumberStrategy::new()?),
            Box::new(SequenceStrategy::new()?),
        ]))
    }

    /// 使用自定义策略列表创建抽取器（按列表顺序尝试）
    pub fn with_strategies(strategies: Vec<Box<dyn AnswerKeyStrategy>>) -> Self {
        Self { strategies }
    }

    /// 从整卷文本中抽取答案
    ///
    /// 所有策略都失败时返回空表，调用方应视为"答案无法恢复"而不是错误。
    pub fn extract(&self, combined_text: &str) -> AnswerMap {
        self.extract_with_strategy(combined_text)
            .map(|(_, answers)| answers)
            .unwrap_or_default()
    }

    /// 与 [`extract`](Self::extract) 相同，同时返回生效的策略名称
    pub fn extract_with_strategy(&self, combined_text: &str) -> Option<(&'static str, AnswerMap)> {
        if combined_text.trim().is_empty() {
            warn!("文本为空，无法抽取答案");
            return None;
        }

        for strategy in &self.strategies {
            if let Some(answers) = strategy.extract(combined_text) {
                info!(
                    "✓ 使用 {} 策略抽取到 {} 个答案",
                    strategy.name(),
                    answers.len()
                );
                return Some((strategy.name(), answers));
            }
        }

        warn!("⚠️ 所有策略都未能抽取到答案");
        None
    }

    /// 从片段序列中抽取答案（片段文本按换行拼接）
    pub fn extract_from_fragments(&self, fragments: &[TextFragment]) -> AnswerMap {
        self.extract(&combined_text(fragments))
    }
}

/// 校验抽取到的答案
///
/// - 答案必须都能解析为整数，否则返回 `false`
/// - 题号小于 1 只记录警告
/// - 数量与 `expected_count` 不符只记录警告（允许部分抽取）
pub fn validate_answers(answers: &AnswerMap, expected_count: Option<usize>) -> bool {
    if answers.is_empty() {
        warn!("没有可校验的答案");
        return false;
    }

    for (q_num, answer) in answers {
        if answer.trim().parse::<i64>().is_err() {
            warn!("Q{} 的答案不合法: '{}'", q_num, answer);
            return false;
        }
        if *q_num < 1 {
            warn!("题号不合法: {}，跳过该条校验", q_num);
        }
    }

    if let Some(expected) = expected_count {
        if answers.len() != expected {
            warn!("期望 {} 个答案，实际得到 {} 个", expected, answers.len());
        }
    }

    debug!("校验通过: {} 个答案", answers.len());
    true
}
