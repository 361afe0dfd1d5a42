//! Process-wide defaults.
//!
//! A single mutable store for the settings every writer and comment
//! helper falls back to. Intended to be configured once at startup;
//! updates are atomic per field and readers observe either the old or
//! the new value. Tests scope a setting with the RAII guards, which
//! restore the previous value on drop.

use std::sync::{Mutex, OnceLock, PoisonError};

use crate::syntax::token::CommentStyle;

#[derive(Debug, Clone)]
struct Context {
    eol: String,
    default_comment_style: CommentStyle,
}

static CONTEXT: OnceLock<Mutex<Context>> = OnceLock::new();

fn context() -> &'static Mutex<Context> {
    CONTEXT.get_or_init(|| {
        Mutex::new(Context {
            eol: platform_eol().to_string(),
            default_comment_style: CommentStyle::Line,
        })
    })
}

fn lock() -> std::sync::MutexGuard<'static, Context> {
    context().lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn platform_eol() -> &'static str {
    if cfg!(windows) { "\r\n" } else { "\n" }
}

/// The line ending new writers default to.
pub fn eol() -> String {
    lock().eol.clone()
}

pub fn set_eol(eol: impl Into<String>) {
    lock().eol = eol.into();
}

/// The style used when comments are attached through the convenience
/// API rather than parsed from text.
pub fn default_comment_style() -> CommentStyle {
    lock().default_comment_style
}

pub fn set_default_comment_style(style: CommentStyle) {
    lock().default_comment_style = style;
}

/// Override the default eol until the guard drops.
pub fn scoped_eol(eol: impl Into<String>) -> ScopedEol {
    let mut guard = lock();
    let previous = std::mem::replace(&mut guard.eol, eol.into());
    ScopedEol { previous }
}

pub struct ScopedEol {
    previous: String,
}

impl Drop for ScopedEol {
    fn drop(&mut self) {
        lock().eol = std::mem::take(&mut self.previous);
    }
}

/// Override the default comment style until the guard drops.
pub fn scoped_comment_style(style: CommentStyle) -> ScopedCommentStyle {
    let mut guard = lock();
    let previous = std::mem::replace(&mut guard.default_comment_style, style);
    ScopedCommentStyle { previous }
}

pub struct ScopedCommentStyle {
    previous: CommentStyle,
}

impl Drop for ScopedCommentStyle {
    fn drop(&mut self) {
        lock().default_comment_style = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_eol_restores_on_drop() {
        let before = eol();
        {
            let _guard = scoped_eol("\r\n");
            assert_eq!(eol(), "\r\n");
        }
        assert_eq!(eol(), before);
    }
}
