//! XML parsing, serialization and pretty printing

pub mod cursor;
pub mod model;
pub mod parser;
pub mod pretty;
pub mod writer;

pub use model::{local_name, Content, Document, Element};
pub use parser::{Config, Parser};
pub use pretty::{pretty_print, FormatConfig};
