use super::error::LexError;
use std::fmt;

/// Classification of a lexical unit, carrying its value where it has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word or dotted field path (e.g. `level`, `user.name`)
    Identifier(String),
    /// Quoted text with escapes already resolved
    String(String),
    Number(u64),
    Equals,
    Contains,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    /// Upper-case name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "IDENTIFIER",
            TokenKind::String(_) => "STRING",
            TokenKind::Number(_) => "NUMBER",
            TokenKind::Equals => "EQUALS",
            TokenKind::Contains => "CONTAINS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Eof => "EOF",
        }
    }

    /// Map a bare word to its operator token if it is a reserved word
    fn keyword(word: &str) -> Option<TokenKind> {
        match word.to_lowercase().as_str() {
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            "contains" => Some(TokenKind::Contains),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token and the zero-based character offset where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Single-pass scanner over the characters of one expression
struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.current().filter(|c| is_identifier_char(*c)) {
            word.push(c);
            self.advance();
        }
        word
    }

    fn read_number(&mut self) -> Result<u64, LexError> {
        let start = self.position;
        let mut digits = String::new();
        while let Some(c) = self.current().filter(char::is_ascii_digit) {
            digits.push(c);
            self.advance();
        }

        digits.parse().map_err(|_| LexError::NumberOutOfRange {
            literal: digits.clone(),
            position: start,
        })
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let Some(quote) = self.current() else {
            return Err(LexError::UnterminatedString { position: start });
        };
        self.advance();

        let mut text = String::new();
        loop {
            match self.current() {
                None => return Err(LexError::UnterminatedString { position: start }),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = self.current().ok_or(LexError::UnexpectedEndOfString {
                        position: self.position,
                    })?;
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        // `\\`, an escaped quote and anything else copy the char as-is
                        other => other,
                    });
                    self.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.position;

        let Some(c) = self.current() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        let kind = match c {
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            '=' => {
                self.advance();
                TokenKind::Equals
            }
            '"' | '\'' => TokenKind::String(self.read_string()?),
            c if c.is_ascii_digit() => TokenKind::Number(self.read_number()?),
            c if is_identifier_char(c) => {
                let word = self.read_identifier();
                TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier(word))
            }
            other => {
                return Err(LexError::UnexpectedCharacter {
                    character: other,
                    position: start,
                });
            }
        };

        Ok(Token::new(kind, start))
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Split a filter expression into tokens, terminated by exactly one `Eof`
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            kinds("level = ERROR"),
            vec![
                TokenKind::Identifier("level".to_string()),
                TokenKind::Equals,
                TokenKind::Identifier("ERROR".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("AND Or nOt CONTAINS"),
            vec![
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Contains,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions_are_char_offsets() {
        let tokens = tokenize("é = 'ü' or x").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 4, 8, 11, 12]);
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(
            kinds(r#""a\n\t\r\\\"\q""#),
            vec![TokenKind::String("a\n\t\r\\\"q".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds(r"'it\'s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_other_quote_inside_string_is_literal() {
        assert_eq!(
            kinds(r#"'say "hi"'"#),
            vec![TokenKind::String("say \"hi\"".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_number_then_identifier() {
        assert_eq!(
            kinds("123abc"),
            vec![
                TokenKind::Number(123),
                TokenKind::Identifier("abc".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_overflow() {
        let err = tokenize("n = 99999999999999999999999").unwrap_err();
        assert_eq!(
            err,
            LexError::NumberOutOfRange {
                literal: "99999999999999999999999".to_string(),
                position: 4,
            }
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"message = "unterminated"#).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { position: 10 });
        assert_eq!(err.to_string(), "Unterminated string literal");
    }

    #[test]
    fn test_trailing_backslash() {
        let err = tokenize(r#"m = "abc\"#).unwrap_err();
        assert_eq!(err, LexError::UnexpectedEndOfString { position: 9 });
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("level != ERROR").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '!',
                position: 6,
            }
        );
        assert_eq!(err.to_string(), "Unexpected character: ! at position 6");
    }

    #[test]
    fn test_empty_input_is_just_eof() {
        assert_eq!(tokenize("  \t\n").unwrap(), vec![Token::new(TokenKind::Eof, 4)]);
    }
}
