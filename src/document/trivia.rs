//! Per-node formatting metadata.
//!
//! Line counts are newline counts relative to the previous sibling (or
//! opener); negative means "unspecified, use the writer default". The
//! comment map is lazily boxed since most nodes carry no comments.

use crate::document::comment::{CommentData, CommentType};

#[derive(Debug, Clone, PartialEq)]
pub struct Trivia {
    lines_above: i32,
    lines_between: i32,
    lines_trailing: i32,
    comments: Option<Box<CommentMap>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct CommentMap {
    header: Option<CommentData>,
    value: Option<CommentData>,
    eol: Option<CommentData>,
    interior: Option<CommentData>,
    footer: Option<CommentData>,
}

impl CommentMap {
    fn slot(&self, comment_type: CommentType) -> &Option<CommentData> {
        match comment_type {
            CommentType::Header => &self.header,
            CommentType::Value => &self.value,
            CommentType::Eol => &self.eol,
            CommentType::Interior => &self.interior,
            CommentType::Footer => &self.footer,
        }
    }

    fn slot_mut(&mut self, comment_type: CommentType) -> &mut Option<CommentData> {
        match comment_type {
            CommentType::Header => &mut self.header,
            CommentType::Value => &mut self.value,
            CommentType::Eol => &mut self.eol,
            CommentType::Interior => &mut self.interior,
            CommentType::Footer => &mut self.footer,
        }
    }

    fn is_empty(&self) -> bool {
        self.header.is_none()
            && self.value.is_none()
            && self.eol.is_none()
            && self.interior.is_none()
            && self.footer.is_none()
    }
}

impl Default for Trivia {
    fn default() -> Self {
        Self {
            lines_above: -1,
            lines_between: -1,
            lines_trailing: -1,
            comments: None,
        }
    }
}

impl Trivia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_above(&self) -> i32 {
        self.lines_above
    }

    pub fn lines_between(&self) -> i32 {
        self.lines_between
    }

    pub fn lines_trailing(&self) -> i32 {
        self.lines_trailing
    }

    pub fn set_lines_above(&mut self, lines: i32) {
        self.lines_above = lines;
    }

    pub fn set_lines_between(&mut self, lines: i32) {
        self.lines_between = lines;
    }

    pub fn set_lines_trailing(&mut self, lines: i32) {
        self.lines_trailing = lines;
    }

    pub fn get_comment(&self, comment_type: CommentType) -> Option<&CommentData> {
        self.comments.as_ref()?.slot(comment_type).as_ref()
    }

    pub fn set_comment(&mut self, comment_type: CommentType, data: CommentData) {
        if data.is_empty() {
            self.take_comment(comment_type);
            return;
        }
        *self
            .comments
            .get_or_insert_with(Default::default)
            .slot_mut(comment_type) = Some(data);
    }

    pub fn take_comment(&mut self, comment_type: CommentType) -> Option<CommentData> {
        let map = self.comments.as_mut()?;
        let taken = map.slot_mut(comment_type).take();
        if map.is_empty() {
            self.comments = None;
        }
        taken
    }

    pub fn has_comment(&self, comment_type: CommentType) -> bool {
        self.get_comment(comment_type).is_some()
    }

    pub fn has_any_comment(&self) -> bool {
        self.comments.is_some()
    }

    /// True when every field is still unspecified.
    pub fn is_unspecified(&self) -> bool {
        self.lines_above < 0
            && self.lines_between < 0
            && self.lines_trailing < 0
            && self.comments.is_none()
    }

    /// Fill unspecified fields from `defaults`, consuming it. Specified
    /// fields always win.
    pub fn apply_defaults(&mut self, defaults: Trivia) {
        if self.lines_above < 0 {
            self.lines_above = defaults.lines_above;
        }
        if self.lines_between < 0 {
            self.lines_between = defaults.lines_between;
        }
        if self.lines_trailing < 0 {
            self.lines_trailing = defaults.lines_trailing;
        }

        let Some(incoming) = defaults.comments else {
            return;
        };
        let map = self.comments.get_or_insert_with(Default::default);
        for comment_type in CommentType::ALL {
            let slot = map.slot_mut(comment_type);
            if slot.is_none() {
                *slot = incoming.slot(comment_type).clone();
            }
        }
    }

    /// Reset everything to unspecified.
    pub fn clear(&mut self) {
        *self = Trivia::default();
    }
}

impl CommentType {
    pub const ALL: [CommentType; 5] = [
        CommentType::Header,
        CommentType::Value,
        CommentType::Eol,
        CommentType::Interior,
        CommentType::Footer,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::comment::Comment;
    use crate::syntax::token::CommentStyle;

    fn data(text: &str) -> CommentData {
        let mut d = CommentData::new();
        d.append_comment(Comment::new(CommentStyle::Line, text));
        d
    }

    #[test]
    fn defaults_are_unspecified() {
        let trivia = Trivia::new();
        assert!(trivia.is_unspecified());
        assert_eq!(trivia.lines_above(), -1);
    }

    #[test]
    fn apply_defaults_keeps_specified_fields() {
        let mut trivia = Trivia::new();
        trivia.set_lines_above(2);

        let mut defaults = Trivia::new();
        defaults.set_lines_above(0);
        defaults.set_lines_between(1);
        defaults.set_comment(CommentType::Header, data("h"));

        trivia.apply_defaults(defaults);
        assert_eq!(trivia.lines_above(), 2);
        assert_eq!(trivia.lines_between(), 1);
        assert!(trivia.has_comment(CommentType::Header));
    }

    #[test]
    fn empty_comment_data_clears_the_slot() {
        let mut trivia = Trivia::new();
        trivia.set_comment(CommentType::Eol, data("c"));
        trivia.set_comment(CommentType::Eol, CommentData::new());
        assert!(!trivia.has_comment(CommentType::Eol));
        assert!(!trivia.has_any_comment());
    }
}
