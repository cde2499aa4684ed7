use std::iter::Peekable;

use owned_chars::OwnedChars;
use tracing::trace;

use super::{Token, TokenKind};

/// Turns source text into tokens, one `next_token` call at a time.
pub struct Lexer {
    // Scratch pad for the token being built
    scratch: String,
    chars: Peekable<OwnedChars>,
    done: bool,
}

impl Lexer {
    /// Creates a new `Lexer` that owns `source`.
    #[must_use]
    pub fn new(source: String) -> Self {
        Lexer {
            scratch: String::with_capacity(64),
            chars: OwnedChars::from_string(source).peekable(),
            done: false,
        }
    }

    /// Returns the next token in the input.
    ///
    /// Once the input is exhausted every further call returns an `Eof` token.
    /// Unrecognized characters come back as `Illegal` tokens rather than errors.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.scratch.clear();

        let c = match self.advance() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, ""),
        };

        match c {
            '=' => self.either_or_equal(TokenKind::Eq, TokenKind::Assign),
            '!' => self.either_or_equal(TokenKind::NotEq, TokenKind::Bang),
            '+' => self.token(TokenKind::Plus),
            '-' => self.token(TokenKind::Minus),
            '*' => self.token(TokenKind::Asterisk),
            '/' => self.token(TokenKind::Slash),
            '<' => self.token(TokenKind::Lt),
            '>' => self.token(TokenKind::Gt),
            ',' => self.token(TokenKind::Comma),
            ';' => self.token(TokenKind::Semicolon),
            ':' => self.token(TokenKind::Colon),
            '(' => self.token(TokenKind::LParen),
            ')' => self.token(TokenKind::RParen),
            '{' => self.token(TokenKind::LBrace),
            '}' => self.token(TokenKind::RBrace),
            '[' => self.token(TokenKind::LBracket),
            ']' => self.token(TokenKind::RBracket),
            '"' => self.string(),
            c if Lexer::is_letter(Some(c)) => self.identifier(),
            c if Lexer::is_digit(Some(c)) => self.integer(),
            c => {
                trace!(character = %c, "illegal character");
                self.token(TokenKind::Illegal)
            }
        }
    }

    /// Drains the lexer, returning every token up to and including `Eof`.
    pub fn tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let at_end = token.kind == TokenKind::Eof;
            tokens.push(token);

            if at_end {
                return tokens;
            }
        }
    }

    // `==` and `!=` share their first character with `=` and `!`
    fn either_or_equal(&mut self, yes: TokenKind, no: TokenKind) -> Token {
        if let Some('=') = self.peek() {
            self.advance();
            self.token(yes)
        } else {
            self.token(no)
        }
    }

    fn identifier(&mut self) -> Token {
        while Lexer::is_letter(self.peek()) {
            self.advance();
        }

        self.token(TokenKind::lookup_ident(&self.scratch))
    }

    fn integer(&mut self) -> Token {
        while Lexer::is_digit(self.peek()) {
            self.advance();
        }

        self.token(TokenKind::Int)
    }

    /// Everything up to the closing quote (or the end of input) is the
    /// literal. There are no escape sequences.
    fn string(&mut self) -> Token {
        self.scratch.clear();
        while let Some(c) = self.chars.next() {
            if c == '"' {
                break;
            }
            self.scratch.push(c);
        }

        self.token(TokenKind::String)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.chars.next();
        }
    }

    /// Adapter for Option<char>
    fn is_letter(c: Option<char>) -> bool {
        c.map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
    }

    /// Adapter for Option<char>
    fn is_digit(c: Option<char>) -> bool {
        c.map_or(false, |c| c.is_ascii_digit())
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        if self.done {
            return None;
        }

        match self.chars.next() {
            Some(c) => {
                self.scratch.push(c);
                Some(c)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, &self.scratch)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then(|| token)
    }
}
