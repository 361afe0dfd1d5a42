//! Extension-to-format dispatch.
//!
//! Maps a lowercase file extension to a parse function and a write
//! function. `json` and `xjs` are always registered; registration is
//! idempotent, and the default extension when a path has none is `xjs`.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::document::Value;
use crate::error::SyntaxError;
use crate::write::options::WriterOptions;
use crate::{parse, write};

pub type ParseFn = fn(&str) -> Result<Value, SyntaxError>;
pub type WriteFn = fn(&Value, &WriterOptions) -> String;

#[derive(Debug, Clone, Copy)]
pub struct Format {
    pub parse: ParseFn,
    pub write: WriteFn,
}

pub const DEFAULT_EXTENSION: &str = "xjs";

struct Registry {
    formats: HashMap<String, Format>,
    aliases: HashMap<String, String>,
}

static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();

fn registry() -> &'static RwLock<Registry> {
    REGISTRY.get_or_init(|| {
        let mut formats = HashMap::new();
        formats.insert(
            "xjs".to_string(),
            Format {
                parse: parse::parse,
                write: write::write_xjs,
            },
        );
        formats.insert(
            "json".to_string(),
            Format {
                parse: parse::parse_json,
                write: write::write_json,
            },
        );

        RwLock::new(Registry {
            formats,
            aliases: HashMap::new(),
        })
    })
}

/// Register (or replace) the format behind an extension.
pub fn register(extension: &str, format: Format) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .formats
        .insert(extension.to_ascii_lowercase(), format);
}

/// Point an alias extension at an already-registered one.
pub fn register_alias(alias: &str, extension: &str) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .aliases
        .insert(alias.to_ascii_lowercase(), extension.to_ascii_lowercase());
}

/// The format for an extension, following one alias hop.
pub fn lookup(extension: &str) -> Option<Format> {
    let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
    let key = extension.to_ascii_lowercase();
    let key = registry.aliases.get(&key).unwrap_or(&key);
    registry.formats.get(key).copied()
}

fn format_for(path: &Path) -> Format {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(lookup)
        .or_else(|| lookup(DEFAULT_EXTENSION))
        .unwrap_or(Format {
            parse: parse::parse,
            write: write::write_xjs,
        })
}

/// Failure reading a document from disk.
#[derive(Debug)]
pub enum FileError {
    Io(io::Error),
    Syntax(SyntaxError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Io(err) => err.fmt(f),
            FileError::Syntax(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(err) => Some(err),
            FileError::Syntax(err) => Some(err),
        }
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        FileError::Io(err)
    }
}

impl From<SyntaxError> for FileError {
    fn from(err: SyntaxError) -> Self {
        FileError::Syntax(err)
    }
}

/// Parse a file, dispatching on its extension.
pub fn read_file(path: impl AsRef<Path>) -> Result<Value, FileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let format = format_for(path);
    Ok((format.parse)(&text)?)
}

/// Write a value to a file with default options, dispatching on the
/// extension.
pub fn write_file(path: impl AsRef<Path>, value: &Value) -> io::Result<()> {
    let path = path.as_ref();
    let format = format_for(path);
    let text = (format.write)(value, &WriterOptions::default());
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_extensions_are_present() {
        assert!(lookup("xjs").is_some());
        assert!(lookup("json").is_some());
        assert!(lookup("JSON").is_some());
        assert!(lookup("toml").is_none());
    }

    #[test]
    fn aliases_resolve_one_hop() {
        register_alias("conf", "xjs");
        assert!(lookup("conf").is_some());
    }

    #[test]
    fn dispatch_is_strict_per_extension() {
        let json = lookup("json").expect("registered");
        assert!((json.parse)("[1,2,]").is_err());

        let xjs = lookup("xjs").expect("registered");
        assert!((xjs.parse)("[1,2,]").is_ok());
    }
}
