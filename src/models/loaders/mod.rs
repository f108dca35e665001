pub mod json_loader;

pub use json_loader::{discover_papers, load_extraction_file, PaperSource};
