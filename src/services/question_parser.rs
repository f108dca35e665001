//! 题目解析服务 - 业务能力层
//!
//! 只负责"把一卷的文本片段还原成题目"能力，不关心文件和数据集。
//!
//! ## 算法
//!
//! 1. 顺序扫描片段，记录题号标签（整段只有 `Q1.` 之类）和选项标记
//!    （整段只有 `(1)`..`(4)`）
//! 2. 每道题的范围从它的标签之后到下一道题的标签之前，依次尝试：
//!    - [`MarkerOptionStrategy`]：范围内 4 个独立标记齐全
//!    - [`InlineOptionStrategy`]：拼接文本中能找到 `(1)`..`(4)`
//!    - 都失败则按整数题处理（整段文本作为题干，无选项）
//! 3. 题干为空的题目直接丢弃
//!
//! 任何输入都不会产生错误，只会得到更少的题目或空选项。

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppResult;
use crate::models::fragment::TextFragment;
use crate::models::question::ParsedQuestion;

const MARKER_TEXTS: [&str; 4] = ["(1)", "(2)", "(3)", "(4)"];

/// 同一题号出现多次时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLabelPolicy {
    /// 以最后一次出现的标签为准，之前的同号题目被丢弃
    #[default]
    LastWins,
    /// 以第一次出现的标签为准，之后的同号题目被丢弃
    FirstWins,
}

impl DuplicateLabelPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "last_wins" | "last" => Some(Self::LastWins),
            "first_wins" | "first" => Some(Self::FirstWins),
            _ => None,
        }
    }
}

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub duplicate_labels: DuplicateLabelPolicy,
    /// 是否接受不带 `Q` 的纯数字标签（如 `12.`）
    pub bare_number_labels: bool,
}

/// 题号标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuestionStart {
    number: u32,
    /// 在有序片段序列中的位置
    index: usize,
}

/// 独立的选项标记片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMarker {
    pub digit: u8,
    /// 在有序片段序列中的位置
    pub index: usize,
}

/// 一道题的片段范围（不含题号标签本身）
pub struct QuestionSpan<'a> {
    /// 范围内第一个片段在有序序列中的位置
    pub first_index: usize,
    pub fragments: &'a [&'a TextFragment],
    /// 范围内的选项标记，按位置排序
    pub markers: Vec<OptionMarker>,
}

impl QuestionSpan<'_> {
    /// 按顺序拼接范围内的非空文本
    pub fn joined_text(&self) -> String {
        join_texts(self.fragments.iter().copied())
    }

    fn fragment_at(&self, index: usize) -> Option<&TextFragment> {
        index
            .checked_sub(self.first_index)
            .and_then(|offset| self.fragments.get(offset))
            .copied()
    }

    fn end_index(&self) -> usize {
        self.first_index + self.fragments.len()
    }
}

/// 选项策略的结果：题干 + 按 1..4 排好序的 4 个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSplit {
    pub stem: String,
    pub options: Vec<String>,
}

/// 选项切分策略
///
/// 只有得到干净的 4 个非空选项时才返回 `Some`。
pub trait OptionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn split(&self, span: &QuestionSpan<'_>) -> Option<OptionSplit>;
}

/// 基于独立标记片段 `(1)`..`(4)` 切分选项
pub struct MarkerOptionStrategy;

impl OptionStrategy for MarkerOptionStrategy {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn split(&self, span: &QuestionSpan<'_>) -> Option<OptionSplit> {
        let first_marker = span.markers.first()?.index;

        // 同一数字出现多次时取最后一次
        let positions: BTreeMap<u8, usize> =
            span.markers.iter().map(|m| (m.digit, m.index)).collect();
        if !(1..=4).all(|d| positions.contains_key(&d)) {
            return None;
        }

        let stem = join_texts((span.first_index..first_marker).filter_map(|i| span.fragment_at(i)));

        let mut ordered: Vec<(u8, usize)> = positions.into_iter().collect();
        ordered.sort_by_key(|&(_, idx)| idx);

        let mut bodies: Vec<(u8, String)> = Vec::with_capacity(4);
        for (pos, &(digit, idx)) in ordered.iter().enumerate() {
            let next = ordered
                .get(pos + 1)
                .map(|&(_, next_idx)| next_idx)
                .unwrap_or_else(|| span.end_index());
            let body = join_texts(
                (idx + 1..next)
                    .filter_map(|i| span.fragment_at(i))
                    .filter(|f| !is_marker_text(f.text.trim())),
            );
            if body.is_empty() {
                return None;
            }
            bodies.push((digit, body));
        }

        bodies.sort_by_key(|&(digit, _)| digit);
        Some(OptionSplit {
            stem,
            options: bodies.into_iter().map(|(_, body)| body).collect(),
        })
    }
}

/// 在拼接后的文本中查找内联的 `(1) .. (4)` 切分选项
pub struct InlineOptionStrategy {
    pattern: Regex,
}

impl InlineOptionStrategy {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(r"\(([1-4])\)\s*")?,
        })
    }

    /// 对一段文本做内联切分
    pub fn split_text(&self, text: &str) -> Option<OptionSplit> {
        // digit -> (标记起点, 选项正文起点)，只取每个数字的第一次出现
        let mut first_seen: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
        for cap in self.pattern.captures_iter(text) {
            let (Some(whole), Some(digit)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let Ok(digit) = digit.as_str().parse::<u8>() else {
                continue;
            };
            first_seen.entry(digit).or_insert((whole.start(), whole.end()));
        }

        if first_seen.len() != 4 {
            return None;
        }

        let mut ordered: Vec<(u8, usize, usize)> = first_seen
            .into_iter()
            .map(|(digit, (start, body_start))| (digit, start, body_start))
            .collect();
        ordered.sort_by_key(|&(_, start, _)| start);

        let stem = text[..ordered[0].1].trim().to_string();

        let mut bodies: Vec<(u8, String)> = Vec::with_capacity(4);
        for (pos, &(digit, _, body_start)) in ordered.iter().enumerate() {
            let end = ordered
                .get(pos + 1)
                .map(|&(_, next_start, _)| next_start)
                .unwrap_or(text.len());
            let body = text[body_start..end].trim();
            if body.is_empty() {
                return None;
            }
            bodies.push((digit, body.to_string()));
        }

        bodies.sort_by_key(|&(digit, _)| digit);
        Some(OptionSplit {
            stem,
            options: bodies.into_iter().map(|(_, body)| body).collect(),
        })
    }
}

impl OptionStrategy for InlineOptionStrategy {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn split(&self, span: &QuestionSpan<'_>) -> Option<OptionSplit> {
        self.split_text(&span.joined_text())
    }
}

/// 单个候选题目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// 成功解析；`strategy` 为生效的选项策略，整数题为 `"integer"`
    Parsed {
        question: ParsedQuestion,
        strategy: &'static str,
    },
    /// 题干为空，丢弃
    EmptyStem,
    /// 被同号的另一个标签取代
    Superseded,
}

/// 一个题号标签对应的候选题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCandidate {
    pub question_number: u32,
    /// 标签片段在有序序列中的位置
    pub start_index: usize,
    pub outcome: CandidateOutcome,
}

/// 基于标记的题目解析器
pub struct MarkerBasedQuestionParser {
    paper_id: String,
    options: ParserOptions,
    question_start: Regex,
    strategies: Vec<Box<dyn OptionStrategy>>,
}

impl MarkerBasedQuestionParser {
    /// 使用默认选项创建解析器
    pub fn new(paper_id: impl Into<String>) -> AppResult<Self> {
        Self::with_options(paper_id, ParserOptions::default())
    }

    pub fn with_options(paper_id: impl Into<String>, options: ParserOptions) -> AppResult<Self> {
        let question_start = if options.bare_number_labels {
            Regex::new(r"^(?:Q\s*\.?\s*)?(\d+)\s*[).:\-]?$")?
        } else {
            Regex::new(r"^Q\s*\.?\s*(\d+)\s*[).:\-]?$")?
        };

        Ok(Self {
            paper_id: paper_id.into(),
            options,
            question_start,
            strategies: vec![
                Box::new(MarkerOptionStrategy),
                Box::new(InlineOptionStrategy::new()?),
            ],
        })
    }

    /// 解析一卷的片段，返回按出现顺序排列的题目
    pub fn parse(&self, fragments: &[TextFragment]) -> Vec<ParsedQuestion> {
        self.parse_candidates(fragments)
            .into_iter()
            .filter_map(|candidate| match candidate.outcome {
                CandidateOutcome::Parsed { question, .. } => Some(question),
                _ => None,
            })
            .collect()
    }

    /// 解析并保留每个题号标签的处理结果，便于排查题目为何消失
    pub fn parse_candidates(&self, fragments: &[TextFragment]) -> Vec<QuestionCandidate> {
        let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
        ordered.sort_by_key(|f| f.order_index);

        let (starts, markers) = self.scan(&ordered);
        let superseded = self.superseded_starts(&starts);

        let mut candidates = Vec::with_capacity(starts.len());
        for (qi, start) in starts.iter().enumerate() {
            let outcome = if superseded.contains(&start.index) {
                CandidateOutcome::Superseded
            } else {
                let span_end = starts
                    .get(qi + 1)
                    .map(|next| next.index)
                    .unwrap_or(ordered.len());
                let first_index = start.index + 1;
                let span = QuestionSpan {
                    first_index,
                    fragments: &ordered[first_index..span_end],
                    markers: markers
                        .iter()
                        .filter(|m| m.index >= first_index && m.index < span_end)
                        .copied()
                        .collect(),
                };
                self.build_question(start.number, &span)
            };

            if let CandidateOutcome::Parsed { strategy, .. } = &outcome {
                debug!("题目 {} 使用 {} 策略解析", start.number, strategy);
            } else {
                debug!("题目 {} 未输出: {:?}", start.number, outcome);
            }

            candidates.push(QuestionCandidate {
                question_number: start.number,
                start_index: start.index,
                outcome,
            });
        }

        candidates
    }

    /// 第一阶段：定位题号标签和选项标记
    fn scan(&self, ordered: &[&TextFragment]) -> (Vec<QuestionStart>, Vec<OptionMarker>) {
        let mut starts = Vec::new();
        let mut markers = Vec::new();

        for (index, fragment) in ordered.iter().enumerate() {
            let text = fragment.text.trim();

            if let Some(number) = self.question_number(text) {
                starts.push(QuestionStart { number, index });
                continue;
            }

            if let Some(digit) = marker_digit(text) {
                markers.push(OptionMarker { digit, index });
            }
        }

        (starts, markers)
    }

    fn question_number(&self, text: &str) -> Option<u32> {
        self.question_start
            .captures(text)
            .and_then(|cap| cap[1].parse::<u32>().ok())
            .filter(|&n| n >= 1)
    }

    /// 根据重复标签策略找出需要丢弃的标签位置
    fn superseded_starts(&self, starts: &[QuestionStart]) -> HashSet<usize> {
        let mut keep: BTreeMap<u32, usize> = BTreeMap::new();
        for start in starts {
            match self.options.duplicate_labels {
                DuplicateLabelPolicy::LastWins => {
                    keep.insert(start.number, start.index);
                }
                DuplicateLabelPolicy::FirstWins => {
                    keep.entry(start.number).or_insert(start.index);
                }
            }
        }

        starts
            .iter()
            .filter(|s| keep.get(&s.number) != Some(&s.index))
            .map(|s| s.index)
            .collect()
    }

    /// 第二阶段：为一道题分配题干和选项
    fn build_question(&self, number: u32, span: &QuestionSpan<'_>) -> CandidateOutcome {
        let (split, strategy) = self
            .strategies
            .iter()
            .find_map(|s| s.split(span).map(|split| (split, s.name())))
            .unwrap_or_else(|| {
                (
                    OptionSplit {
                        stem: span.joined_text(),
                        options: Vec::new(),
                    },
                    "integer",
                )
            });

        if split.stem.is_empty() {
            return CandidateOutcome::EmptyStem;
        }

        let (page_start, page_end) = page_range(span.fragments);
        CandidateOutcome::Parsed {
            question: ParsedQuestion {
                paper_id: self.paper_id.clone(),
                question_number: number,
                question_text: split.stem,
                options: split.options,
                page_start,
                page_end,
            },
            strategy,
        }
    }
}

fn is_marker_text(text: &str) -> bool {
    MARKER_TEXTS.contains(&text)
}

fn marker_digit(text: &str) -> Option<u8> {
    MARKER_TEXTS
        .iter()
        .position(|m| *m == text)
        .map(|pos| pos as u8 + 1)
}

fn join_texts<'a>(fragments: impl Iterator<Item = &'a TextFragment>) -> String {
    fragments
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 题干和选项片段的最小 / 最大页码，全部未知时为 (-1, -1)
///
/// 独立的选项标记片段不属于题目内容，不参与计算。
fn page_range(fragments: &[&TextFragment]) -> (i32, i32) {
    let pages = fragments
        .iter()
        .filter(|f| !is_marker_text(f.text.trim()))
        .filter_map(|f| f.page);
    let (min, max) = pages.fold((None, None), |(min, max): (Option<i32>, Option<i32>), p| {
        (
            Some(min.map_or(p, |m| m.min(p))),
            Some(max.map_or(p, |m| m.max(p))),
        )
    });
    (min.unwrap_or(-1), max.unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MarkerBasedQuestionParser {
        MarkerBasedQuestionParser::new("paper-1").unwrap()
    }

    fn fragments(texts: &[&str]) -> Vec<TextFragment> {
        TextFragment::from_texts(texts, Some(1))
    }

    fn assert_invariants(questions: &[ParsedQuestion]) {
        for q in questions {
            assert!(q.question_number >= 1);
            assert!(!q.question_text.trim().is_empty());
            assert!(q.options.is_empty() || q.options.len() == 4, "{:?}", q.options);
            assert!(q.options.iter().all(|o| !o.trim().is_empty()));
        }
    }

    #[test]
    fn test_marker_based_question() {
        let questions = parser().parse(&fragments(&[
            "Q1.", "What is 2+2", "(1)", "3", "(2)", "4", "(3)", "5", "(4)", "6",
        ]));

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.paper_id, "paper-1");
        assert_eq!(q.question_number, 1);
        assert_eq!(q.question_text, "What is 2+2");
        assert_eq!(q.options, vec!["3", "4", "5", "6"]);
        assert_eq!((q.page_start, q.page_end), (1, 1));
    }

    #[test]
    fn test_markers_out_of_order_are_reordered() {
        let questions = parser().parse(&fragments(&[
            "Q5", "Stem text", "(3)", "C-text", "(1)", "A-text", "(4)", "D-text", "(2)", "B-text",
        ]));

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_number, 5);
        assert_eq!(questions[0].question_text, "Stem text");
        assert_eq!(questions[0].options, vec!["A-text", "B-text", "C-text", "D-text"]);
    }

    #[test]
    fn test_integer_question_without_markers() {
        let questions = parser().parse(&fragments(&[
            "Q2.",
            "An integer answer question asking for ___",
        ]));

        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_empty());
        assert_eq!(
            questions[0].question_text,
            "An integer answer question asking for ___"
        );
    }

    #[test]
    fn test_multiple_questions_and_page_span() {
        let mut frags = vec![
            TextFragment::new(Some(1), "Q1.", 0),
            TextFragment::new(Some(1), "First stem", 1),
            TextFragment::new(Some(1), "(1)", 2),
            TextFragment::new(Some(1), "a", 3),
            TextFragment::new(Some(1), "(2)", 4),
            TextFragment::new(Some(2), "b", 5),
            TextFragment::new(Some(2), "(3)", 6),
            TextFragment::new(Some(2), "c", 7),
            TextFragment::new(Some(2), "(4)", 8),
            TextFragment::new(Some(2), "d", 9),
            TextFragment::new(Some(3), "Q2", 10),
            TextFragment::new(None, "Second stem", 11),
        ];
        // 输入顺序被打乱时按 order_index 还原
        frags.reverse();

        let questions = parser().parse(&frags);
        assert_eq!(questions.len(), 2);
        assert_eq!((questions[0].page_start, questions[0].page_end), (1, 2));
        assert_eq!(questions[1].question_number, 2);
        assert_eq!((questions[1].page_start, questions[1].page_end), (-1, -1));
        assert_invariants(&questions);
    }

    #[test]
    fn test_page_span_ignores_bare_markers() {
        let frags = vec![
            TextFragment::new(Some(4), "Q7.", 0),
            TextFragment::new(Some(4), "Stem on page four", 1),
            TextFragment::new(Some(5), "(1)", 2),
            TextFragment::new(Some(4), "a", 3),
            TextFragment::new(Some(5), "(2)", 4),
            TextFragment::new(Some(4), "b", 5),
            TextFragment::new(Some(3), "(3)", 6),
            TextFragment::new(Some(4), "c", 7),
            TextFragment::new(Some(5), "(4)", 8),
            TextFragment::new(Some(4), "d", 9),
        ];

        let questions = parser().parse(&frags);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options, vec!["a", "b", "c", "d"]);
        assert_eq!((questions[0].page_start, questions[0].page_end), (4, 4));
    }

    #[test]
    fn test_inline_options_fallback() {
        let questions = parser().parse(&fragments(&[
            "Q39.",
            "Given below are two statements:",
            "(1) Both Statement I and II are true (2) Statement I is true",
            "(3) Statement II is true (4) Both are false",
        ]));

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.question_text, "Given below are two statements:");
        assert_eq!(
            q.options,
            vec![
                "Both Statement I and II are true",
                "Statement I is true",
                "Statement II is true",
                "Both are false",
            ]
        );
    }

    #[test]
    fn test_inline_options_scrambled_order() {
        let questions = parser().parse(&fragments(&[
            "Q7",
            "Pick one (2) beta (4) delta (1) alpha (3) gamma",
        ]));

        assert_eq!(questions[0].question_text, "Pick one");
        assert_eq!(questions[0].options, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn test_partial_markers_fall_back_to_full_text_stem() {
        let questions = parser().parse(&fragments(&[
            "Q3.", "Choose", "(1)", "x", "(2)", "y", "(3)", "z",
        ]));

        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_empty());
        assert_eq!(questions[0].question_text, "Choose (1) x (2) y (3) z");
    }

    #[test]
    fn test_inline_missing_digit_keeps_markers_in_stem() {
        let questions = parser().parse(&fragments(&["Q4", "Stem (1)(1)(2)(3) tail"]));

        assert!(questions[0].options.is_empty());
        assert_eq!(questions[0].question_text, "Stem (1)(1)(2)(3) tail");
    }

    #[test]
    fn test_inline_empty_option_body_is_rejected() {
        // (1) 与 (2) 之间没有正文
        let questions = parser().parse(&fragments(&["Q4", "Stem (1) (2) b (3) c (4) d"]));

        assert!(questions[0].options.is_empty());
        assert_eq!(questions[0].question_text, "Stem (1) (2) b (3) c (4) d");
    }

    #[test]
    fn test_inline_duplicate_digit_stays_in_previous_option() {
        let questions = parser().parse(&fragments(&["Q8", "S (1) a (2) b (1) again (3) c (4) d"]));

        let q = &questions[0];
        assert_eq!(q.question_text, "S");
        assert_eq!(q.options, vec!["a", "b (1) again", "c", "d"]);
        assert_invariants(&questions);
    }

    #[test]
    fn test_marker_with_empty_body_falls_through() {
        let questions = parser().parse(&fragments(&[
            "Q9", "Stem", "(1)", "(2)", "b", "(3)", "c", "(4)", "d",
        ]));

        assert!(questions[0].options.is_empty());
        assert_eq!(questions[0].question_text, "Stem (1) (2) b (3) c (4) d");
    }

    #[test]
    fn test_empty_stem_is_dropped() {
        let parser = parser();
        let frags = fragments(&["Q1.", "", "  ", "Q2.", "kept"]);

        let questions = parser.parse(&frags);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_number, 2);

        let candidates = parser.parse_candidates(&frags);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].outcome, CandidateOutcome::EmptyStem);
    }

    #[test]
    fn test_markers_without_stem_are_dropped() {
        let questions = parser().parse(&fragments(&[
            "Q1", "(1)", "a", "(2)", "b", "(3)", "c", "(4)", "d",
        ]));
        assert!(questions.is_empty());
    }

    #[test]
    fn test_question_label_grammar_is_strict() {
        let questions = parser().parse(&fragments(&[
            "Q1.",
            "Q2 is mentioned inline here",
            "Q. 3",
            "third",
            "Q4:",
            "fourth",
            "Q0",
            "zero is not a question",
        ]));

        let numbers: Vec<u32> = questions.iter().map(|q| q.question_number).collect();
        assert_eq!(numbers, vec![1, 3, 4]);
        assert_eq!(questions[0].question_text, "Q2 is mentioned inline here");
        assert_eq!(questions[2].question_text, "fourth Q0 zero is not a question");
    }

    #[test]
    fn test_bare_number_labels_are_opt_in() {
        let frags = fragments(&["12.", "bare label", "13)", "another"]);

        assert!(parser().parse(&frags).is_empty());

        let parser = MarkerBasedQuestionParser::with_options(
            "paper-1",
            ParserOptions {
                bare_number_labels: true,
                ..Default::default()
            },
        )
        .unwrap();
        let numbers: Vec<u32> = parser.parse(&frags).iter().map(|q| q.question_number).collect();
        assert_eq!(numbers, vec![12, 13]);
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let parser = parser();
        let frags = fragments(&["Q1.", "first copy", "Q1.", "second copy", "Q2.", "other"]);

        let questions = parser.parse(&frags);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "second copy");

        let candidates = parser.parse_candidates(&frags);
        assert_eq!(candidates[0].outcome, CandidateOutcome::Superseded);
    }

    #[test]
    fn test_duplicate_labels_first_wins() {
        let parser = MarkerBasedQuestionParser::with_options(
            "paper-1",
            ParserOptions {
                duplicate_labels: DuplicateLabelPolicy::FirstWins,
                ..Default::default()
            },
        )
        .unwrap();

        let questions =
            parser.parse(&fragments(&["Q1.", "first copy", "Q1.", "second copy", "Q2.", "other"]));
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "first copy");
        assert_eq!(questions[1].question_number, 2);
    }

    #[test]
    fn test_text_before_first_label_is_ignored() {
        let questions = parser().parse(&fragments(&["JEE Main 2024", "Physics", "Q1", "stem"]));
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "stem");
    }

    #[test]
    fn test_no_panic_on_degenerate_input() {
        let parser = parser();
        assert!(parser.parse(&[]).is_empty());
        assert!(parser.parse(&fragments(&["Q1"])).is_empty());
        assert!(parser.parse(&fragments(&["(1)", "(2)", "(3)", "(4)"])).is_empty());

        let adversarial = [
            vec!["Q1", "(4)", "(3)", "(2)", "(1)"],
            vec!["Q1", "s", "(1)", "a", "(1)", "b", "(2)", "c", "(3)", "d", "(4)", "e"],
            vec!["Q1", "s (4) (3) (2) (1)"],
            vec!["Q1", "(1)(2)(3)(4)"],
            vec!["Q1", "s (1) a (2) b (3) c (4)"],
            vec!["Q1", "s", "(1)", "a", "Q1", "(2)", "b", "(3)", "c", "(4)", "d"],
        ];
        for texts in adversarial {
            let questions = parser.parse(&fragments(&texts));
            assert_invariants(&questions);
        }
    }

    #[test]
    fn test_duplicate_marker_uses_last_occurrence() {
        let questions = parser().parse(&fragments(&[
            "Q1", "s", "(1)", "a", "(1)", "b", "(2)", "c", "(3)", "d", "(4)", "e",
        ]));

        let q = &questions[0];
        assert_eq!(q.question_text, "s");
        assert_eq!(q.options, vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn test_policy_from_name() {
        assert_eq!(
            DuplicateLabelPolicy::from_name("first_wins"),
            Some(DuplicateLabelPolicy::FirstWins)
        );
        assert_eq!(
            DuplicateLabelPolicy::from_name(" LAST "),
            Some(DuplicateLabelPolicy::LastWins)
        );
        assert_eq!(DuplicateLabelPolicy::from_name("both"), None);
    }
}
