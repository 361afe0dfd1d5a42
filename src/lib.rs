pub mod context;
pub mod document;
pub mod error;
pub mod parse;
pub mod registry;
pub mod syntax;
pub mod write;

pub use document::{
    Array, Comment, CommentData, CommentElement, CommentType, Object, Reference, Trivia, Value,
    ValueKind,
};
pub use error::SyntaxError;
pub use parse::{parse, parse_json};
pub use registry::{read_file, write_file, FileError};
pub use syntax::token::{CommentStyle, StringKind};
pub use write::{write_json, write_xjs, WriterOptions};
