use std::collections::VecDeque;

#[derive(Debug)]
pub struct Tokens {
    offset: VecDeque<usize>,
    toks: VecDeque<Token>,
}

impl Default for Tokens {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokens {
    pub fn new() -> Tokens {
        Tokens {
            offset: VecDeque::new(),
            toks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, tok: Token, offset: usize) {
        self.offset.push_back(offset);
        self.toks.push_back(tok);
    }

    pub fn pop(&mut self) -> Option<(Token, usize)> {
        let tok = self.toks.pop_front()?;
        let offset = self.offset.pop_front().unwrap_or_default();
        Some((tok, offset))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.toks.len()
    }
}

impl Iterator for Tokens {
    type Item = (Token, usize);
    fn next(&mut self) -> Option<(Token, usize)> {
        self.pop()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    TextBlock(String),
}
