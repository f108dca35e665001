//! 文本规范化服务 - 业务能力层
//!
//! 只负责"清洗一段文本"能力：修正抽取出来的数学记号（小数、单位、分数、
//! 指数、三角函数参数）并压缩空白。所有变换都是保守的白名单替换，
//! 不认识的记号原样保留。

use phf::phf_map;
use regex::{Captures, Regex};

use crate::error::AppResult;
use crate::models::question::{NormalizedQuestion, ParsedQuestion};

/// 数学斜体等零散 Unicode 字符 → ASCII / 希腊字母
static UNICODE_REPLACEMENTS: phf::Map<char, &'static str> = phf_map! {
    '−' => "-",
    '–' => "-",
    '𝑔' => "g",
    '𝑇' => "T",
    '𝑅' => "R",
    '𝐿' => "L",
    '𝑀' => "M",
    '𝑡' => "t",
    '𝑚' => "m",
    '𝑣' => "v",
    '𝑎' => "a",
    '𝑘' => "k",
    '𝑛' => "n",
    '𝑟' => "r",
    '𝑥' => "x",
    '𝑦' => "y",
    '𝐸' => "E",
    '𝐹' => "F",
    '𝐼' => "I",
    '𝑉' => "V",
    '𝜃' => "θ",
    '𝜋' => "π",
    '𝜆' => "λ",
    '𝜇' => "μ",
    '𝜔' => "ω",
    '𝛼' => "α",
    '𝛽' => "β",
};

/// 文本规范化器
///
/// 持有一组编译好的正则表达式，构造后可反复使用。
pub struct TextNormalizer {
    spaced_decimal: Regex,
    unit_spacing: Regex,
    fraction_before_unit: Regex,
    standalone_fraction: Regex,
    sci_notation: Regex,
    ten_exponent: Regex,
    unit_exponent: Regex,
    bracket: Regex,
    dimension_exponent: Regex,
    func_arg: Regex,
    percent: Regex,
    multiple_spaces: Regex,
}

impl TextNormalizer {
    /// 编译全部规则
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            // 小数点两侧至少有一侧带空白："0 . 3 0" / "0 .3" / "0. 3"
            spaced_decimal: Regex::new(r"(\d)(?:\s+\.\s*|\s*\.\s+)(\d(?:\s+\d\b)*)")?,
            unit_spacing: Regex::new(r"(\d(?:\.\d+)?)\s*([A-Za-z][A-Za-z]?)\b")?,
            fraction_before_unit: Regex::new(
                r"\b([1-9])\s+([1-9])\s+(kg|m|R|N|J|L|C|V|A|T|H|F)\b",
            )?,
            standalone_fraction: Regex::new(r"\b([1-9]\d?)\s+([1-9]\d?)\b(\s*(?:$|[,;:)]))")?,
            // 指数部分："10^3" / "10^ -3" / "10-3" / "10 - 3" / "10 3"
            sci_notation: Regex::new(
                r"(?i)(\d+(?:\.\d+)?)\s*[x×]\s*10(\s*\^\s*-?\s*|\s*-\s*|\s+)(\d+)",
            )?,
            ten_exponent: Regex::new(r"\b10\s*-\s*(\d+)")?,
            unit_exponent: Regex::new(r"\b(kg|m|s|N|J|W|Hz|Pa|C|V|F|Ω|ohm)\s+-\s*(\d+)")?,
            bracket: Regex::new(r"\[([^\[\]]*)\]")?,
            dimension_exponent: Regex::new(r"([A-Za-z])\s+-\s*(\d+)")?,
            func_arg: Regex::new(
                r"\b(arcsin|arccos|arctan|cosec|sin|cos|tan|cot|sec)\s+(-?\d+(?:\.\d+)?)",
            )?,
            percent: Regex::new(r"(\d(?:\.\d+)?)\s*%")?,
            multiple_spaces: Regex::new(r"\s{2,}")?,
        })
    }

    /// 规范化一段文本
    ///
    /// 变换按固定顺序执行，后面的步骤依赖前面的清理结果。空串原样返回。
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let out = normalize_unicode(text);
        let out = self.normalize_decimals(&out);
        let out = self.normalize_units(&out);
        let out = self.normalize_simple_fractions(&out);
        let out = self.normalize_exponents(&out);
        let out = self.normalize_dimensional_formulas(&out);
        let out = self.normalize_func_args(&out);
        let out = self.normalize_percents(&out);
        self.collapse_spaces(&out)
    }

    /// 分别规范化题干和每个选项，选项数量和顺序不变
    pub fn normalize_pair(&self, stem: &str, options: &[String]) -> (String, Vec<String>) {
        let stem = self.normalize(stem);
        let options = options.iter().map(|o| self.normalize(o)).collect();
        (stem, options)
    }

    /// 生成规范化后的新题目记录，原记录不变
    pub fn normalize_question(&self, question: &ParsedQuestion) -> NormalizedQuestion {
        let (question_text, options) =
            self.normalize_pair(&question.question_text, &question.options);
        NormalizedQuestion {
            paper_id: question.paper_id.clone(),
            question_number: question.question_number,
            question_text,
            options,
            page_start: question.page_start,
            page_end: question.page_end,
        }
    }

    /// "0 . 3 0" → "0.30"，重复执行直到不再变化
    fn normalize_decimals(&self, text: &str) -> String {
        let mut cur = text.to_string();
        loop {
            let next = self
                .spaced_decimal
                .replace_all(&cur, |caps: &Captures| {
                    let digits: String = caps[2].split_whitespace().collect();
                    format!("{}.{}", &caps[1], digits)
                })
                .into_owned();
            if next == cur {
                return cur;
            }
            cur = next;
        }
    }

    /// "10N" → "10 N"；"10 m/s" 保持不变
    fn normalize_units(&self, text: &str) -> String {
        self.unit_spacing
            .replace_all(text, "${1} ${2}")
            .into_owned()
    }

    /// "2 9 m" → "2/9 m"；选项末尾的 "1 2" → "1/2"
    fn normalize_simple_fractions(&self, text: &str) -> String {
        let out = self
            .fraction_before_unit
            .replace_all(text, "${1}/${2} ${3}")
            .into_owned();
        self.standalone_fraction
            .replace_all(&out, |caps: &Captures| {
                // "2 x 10 3" 是科学计数法，留给指数规则处理
                let after_times = caps
                    .get(0)
                    .map(|m| {
                        out[..m.start()]
                            .trim_end()
                            .ends_with(|c: char| matches!(c, 'x' | 'X' | '×'))
                    })
                    .unwrap_or(false);
                if after_times {
                    caps[0].to_string()
                } else {
                    format!("{}/{}{}", &caps[1], &caps[2], &caps[3])
                }
            })
            .into_owned()
    }

    /// "2 x 10 3" → "2 x 10^3"；"10 -2" → "10^-2"；"m s -2" → "m s^-2"
    ///
    /// 科学计数法先于单独的 "10 -n" 处理，一次执行即得到最终形式。
    fn normalize_exponents(&self, text: &str) -> String {
        let out = self.sci_notation.replace_all(text, |caps: &Captures| {
            let sign = if caps[2].contains('-') { "-" } else { "" };
            format!("{} x 10^{}{}", &caps[1], sign, &caps[3])
        });
        let out = self.ten_exponent.replace_all(&out, "10^-${1}");
        self.unit_exponent
            .replace_all(&out, "${1}^-${2}")
            .into_owned()
    }

    /// "[M L - 2 T - 1]" → "[M L^-2 T^-1]"
    fn normalize_dimensional_formulas(&self, text: &str) -> String {
        self.bracket
            .replace_all(text, |caps: &Captures| {
                let inner = self
                    .dimension_exponent
                    .replace_all(&caps[1], "${1}^-${2}");
                format!("[{}]", inner)
            })
            .into_owned()
    }

    /// "sin -20" → "sin(-20)"；已带括号的不处理
    fn normalize_func_args(&self, text: &str) -> String {
        self.func_arg.replace_all(text, "${1}(${2})").into_owned()
    }

    /// "39.9 %" → "39.9%"
    fn normalize_percents(&self, text: &str) -> String {
        self.percent.replace_all(text, "${1}%").into_owned()
    }

    fn collapse_spaces(&self, text: &str) -> String {
        self.multiple_spaces
            .replace_all(text, " ")
            .trim()
            .to_string()
    }
}

fn normalize_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match UNICODE_REPLACEMENTS.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}
