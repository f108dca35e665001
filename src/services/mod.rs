pub mod answer_key;
pub mod dataset_writer;
pub mod question_parser;
pub mod record_filter;
pub mod text_normalizer;
pub mod warn_writer;

pub use answer_key::{validate_answers, AnswerKeyExtractor, AnswerKeyStrategy};
pub use dataset_writer::DatasetWriter;
pub use question_parser::{
    CandidateOutcome, DuplicateLabelPolicy, MarkerBasedQuestionParser, OptionStrategy,
    ParserOptions, QuestionCandidate,
};
pub use record_filter::{is_complex_math, is_integer_type, DroppedQuestion, RecordFilter};
pub use text_normalizer::TextNormalizer;
pub use warn_writer::WarnWriter;
