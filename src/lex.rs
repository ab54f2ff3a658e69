use tracing::trace;

use crate::tokens::{Token, Tokens};

// Pending text block and the offset of its first character.
struct Buffer {
    text: String,
    start: usize,
}

impl Buffer {
    fn flush(&mut self, res: &mut Tokens) {
        if !self.text.is_empty() {
            res.push(
                Token::TextBlock(std::mem::take(&mut self.text)),
                self.start,
            );
        }
    }
}

fn scan(src: &str, flush_tail: bool) -> Tokens {
    let mut res = Tokens::new();
    let mut buf = Buffer {
        text: String::new(),
        start: 0,
    };

    for (col, c) in src.chars().enumerate() {
        match c {
            '(' => {
                buf.flush(&mut res);
                res.push(Token::Open, col);
            }
            ')' => {
                buf.flush(&mut res);
                res.push(Token::Close, col);
            }
            ' ' => buf.flush(&mut res),
            _ => {
                if buf.text.is_empty() {
                    buf.start = col;
                }
                buf.text.push(c);
            }
        }
    }

    if flush_tail {
        buf.flush(&mut res);
    } else if !buf.text.is_empty() {
        trace!(dropped = %buf.text, offset = buf.start, "unterminated text block");
    }
    trace!(count = res.len(), "lexed tokens");
    res
}

/// Splits `src` into tokens. Only the ASCII space separates text blocks, and a
/// text block still pending at the end of input is not emitted.
pub fn lex(src: &str) -> Tokens {
    scan(src, false)
}

/// Like [`lex`], but a text block running up to the end of input is emitted.
pub fn lex_all(src: &str) -> Tokens {
    scan(src, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::TextBlock(s.to_string())
    }

    #[test]
    fn test_lex_list() {
        let res = lex("(id-one id-two)");
        assert_eq!(4, res.len());

        let toks: Vec<(Token, usize)> = res.collect();

        assert_eq!((Token::Open, 0), toks[0]);
        assert_eq!((text("id-one"), 1), toks[1]);
        assert_eq!((text("id-two"), 8), toks[2]);
        assert_eq!((Token::Close, 14), toks[3]);
    }

    #[test]
    fn test_lex_empty() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
    }

    #[test]
    fn test_lex_parens_split_text() {
        let toks: Vec<Token> = lex("a(b)c ").map(|(t, _)| t).collect();
        assert_eq!(
            vec![
                text("a"),
                Token::Open,
                text("b"),
                Token::Close,
                text("c")
            ],
            toks
        );
    }

    #[test]
    fn test_lex_only_space_separates() {
        let toks: Vec<Token> = lex("(a\tb\nc)").map(|(t, _)| t).collect();
        assert_eq!(vec![Token::Open, text("a\tb\nc"), Token::Close], toks);
    }

    #[test]
    fn test_lex_drops_trailing_text() {
        assert!(lex("foo").is_empty());
        let toks: Vec<Token> = lex("(a) b").map(|(t, _)| t).collect();
        assert_eq!(vec![Token::Open, text("a"), Token::Close], toks);
    }

    #[test]
    fn test_lex_all_keeps_trailing_text() {
        let toks: Vec<(Token, usize)> = lex_all("(a) bc").collect();
        assert_eq!(4, toks.len());
        assert_eq!((text("bc"), 4), toks[3]);
    }
}
