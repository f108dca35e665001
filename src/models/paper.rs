use regex::Regex;
use serde::{Deserialize, Serialize};

/// 试卷元数据，从试卷目录名中解析
///
/// 目录名形如 `JEE Main 2024 (01 Feb Shift 1) Previous Year Paper ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMeta {
    pub paper_id: String,
    /// 年份，无法识别时为 0
    pub year: u16,
    /// 日期，如 "01 Feb"，无法识别时为 "Unknown"
    pub date: String,
    /// 场次，无法识别时为 0
    pub shift: u8,
}

impl PaperMeta {
    /// 从目录名解析元数据
    pub fn from_folder_name(folder_name: &str) -> Self {
        let mut meta = Self {
            paper_id: folder_name.to_string(),
            year: 0,
            date: "Unknown".to_string(),
            shift: 0,
        };

        if let Ok(re) = Regex::new(r"JEE Main (\d{4})") {
            if let Some(year) = re
                .captures(folder_name)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse().ok())
            {
                meta.year = year;
            }
        }

        if let Ok(re) = Regex::new(r"\((\d{2} \w+) Shift (\d)\)") {
            if let Some(cap) = re.captures(folder_name) {
                let shift = cap.get(2).and_then(|m| m.as_str().parse().ok());
                if let (Some(date), Some(shift)) = (cap.get(1), shift) {
                    meta.date = date.as_str().to_string();
                    meta.shift = shift;
                }
            }
        }

        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_folder_name() {
        let meta = PaperMeta::from_folder_name(
            "JEE Main 2024 (01 Feb Shift 1) Previous Year Paper with Answer Keys - MathonGo",
        );
        assert_eq!(meta.year, 2024);
        assert_eq!(meta.date, "01 Feb");
        assert_eq!(meta.shift, 1);
    }

    #[test]
    fn test_unrecognised_folder_name_uses_defaults() {
        let meta = PaperMeta::from_folder_name("random paper");
        assert_eq!(meta.paper_id, "random paper");
        assert_eq!(meta.year, 0);
        assert_eq!(meta.date, "Unknown");
        assert_eq!(meta.shift, 0);
    }
}
