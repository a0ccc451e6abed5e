pub mod parser;
pub mod signature;
pub mod cache;
pub mod buffer;
pub mod resolver;
pub mod completion;
pub mod config;
pub mod logging;
pub mod output;


pub use buffer::{Buffer, TextBuffer};
pub use cache::{CacheRecord, ModuleCache};
pub use completion::{CompletionEntry, CompletionSession, CursorToken};
pub use config::Config;
pub use parser::ModuleExportMap;
pub use resolver::AliasMap;
pub use signature::ExportEntry;
