pub mod answer;
pub mod fragment;
pub mod loaders;
pub mod paper;
pub mod question;
pub mod stats;

pub use answer::{parse_mcq_index, AnswerMap};
pub use fragment::{combined_text, ExtractionFile, FragmentText, RawTextBlock, TextFragment};
pub use loaders::{discover_papers, load_extraction_file, PaperSource};
pub use paper::PaperMeta;
pub use question::{CorrectAnswer, DatasetRecord, NormalizedQuestion, ParsedQuestion, QuestionType};
pub use stats::{DatasetStats, DropReason, PaperOutcome, PaperStats};
