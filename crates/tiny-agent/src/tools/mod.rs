//! A set of built-in tools that models can use.

mod edit_file;
mod list_files;
mod read_file;
mod search;

pub use edit_file::EditFileTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use search::SearchTool;
