mod decompress;
mod file_finder;
mod parse_runner;
mod record_builder;
mod xml_parser;

// Re-export public API
pub use decompress::{open_backup, Compression};
pub use file_finder::find_backup_files;
pub use parse_runner::{parse_directory, parse_file, parse_files, ParseOutcome};
pub use xml_parser::{parse_document, parse_records};
