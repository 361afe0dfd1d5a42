//! Number scanning.
//!
//! Numbers are IEEE-754 doubles. Runs that merely look numeric degrade to
//! WORD tokens instead of failing: a leading `0` followed by more digits,
//! and a trailing exponent marker with no digits. The implicit-string
//! machinery then treats the degraded run as text.

use crate::syntax::token::TokenKind;

use super::Tokenizer;

impl Tokenizer {
    /// Entry: current is a digit, or `-` immediately followed by a digit.
    pub(super) fn read_number_kind(&mut self) -> TokenKind {
        let start = self.reader().index();

        self.reader().read_if('-');

        let int_start = self.reader().index();
        let leading_zero = self.reader().current() == Some('0');
        self.consume_digits();

        if leading_zero && self.reader().index() - int_start > 1 {
            // `01`, `007`: more digits after a leading zero.
            self.read_word_run();
            return TokenKind::Word;
        }

        if self.reader().current() == Some('.')
            && self.reader().peek().is_some_and(|c| c.is_ascii_digit())
        {
            self.reader().advance();
            self.consume_digits();
        }

        if matches!(self.reader().current(), Some('e' | 'E')) {
            let sign = matches!(self.reader().peek(), Some('+' | '-'));
            let has_digits = if sign {
                self.reader()
                    .peek2_byte()
                    .is_some_and(|b| b.is_ascii_digit())
            } else {
                self.reader().peek().is_some_and(|c| c.is_ascii_digit())
            };

            if !has_digits {
                // `1e`, `2E`: the marker joins the word, a sign does not.
                self.reader().advance();
                self.read_word_run();
                return TokenKind::Word;
            }

            self.reader().advance();
            if sign {
                self.reader().advance();
            }
            self.consume_digits();
        }

        let end = self.reader().index();
        let text = self.reader().slice(start, end).to_string();
        match text.parse::<f64>() {
            Ok(value) => TokenKind::Number(value),
            Err(_) => TokenKind::Word,
        }
    }

    fn consume_digits(&mut self) {
        while self.reader().current().is_some_and(|c| c.is_ascii_digit()) {
            self.reader().advance();
        }
    }
}
