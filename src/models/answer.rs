use std::collections::BTreeMap;

/// 题号 → 原始答案字符串
///
/// 缺少某个题号表示该题答案无法恢复。
pub type AnswerMap = BTreeMap<u32, String>;

/// 将原始答案解析为 MCQ 选项序号（1-4）
pub fn parse_mcq_index(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|idx| (1..=4).contains(idx))
}
