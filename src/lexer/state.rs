use super::cursor::SourceChar;
use super::token::{Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};
use super::{decode_escapes, LexicalError, LexicalErrorKind};

pub enum LexerStateTransition {
    Stay,
    ChangeState(LexerState),
    ChangeStateAndEmit {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
    },
    ChangeStateAndEmitAndPutBack {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: SourceChar,
    },
    ChangeStateAndEmitAndPutBackTwo {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: (SourceChar, SourceChar),
    },
}

impl LexerStateTransition {
    fn emit(token_or_error: Result<Token, LexicalError>) -> Self {
        Self::ChangeStateAndEmit {
            new_state: LexerState::Normal,
            token_or_error,
        }
    }

    /// Emits and puts back the lookahead if there is one.
    fn emit_before(token_or_error: Result<Token, LexicalError>, next: Option<SourceChar>) -> Self {
        match next {
            Some(put_back) => Self::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error,
                put_back,
            },
            None => Self::emit(token_or_error),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum LexerState {
    #[default]
    Normal,
    Operator(SourceChar),
    Comment,
    Ident(SpanIndex),
    Integer(SpanIndex),
    IntegerDot {
        start: SpanIndex,
        dot: SourceChar,
    },
    Fraction(SpanIndex),
    String {
        start: SpanIndex,
        escaped: bool,
    },
    Char {
        start: SpanIndex,
        escaped: bool,
    },
}

impl LexerState {
    pub fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let end: SpanIndex = source.len().into();
        match *self {
            LexerState::Normal => execute_normal(end, next_char),
            LexerState::Operator(first) => execute_operator(first, next_char),
            LexerState::Comment => match next_char {
                None => LexerStateTransition::emit(Ok(eof(end))),
                Some(SourceChar { value: '\n', .. }) => {
                    LexerStateTransition::ChangeState(LexerState::Normal)
                }
                Some(_) => LexerStateTransition::Stay,
            },
            LexerState::Ident(start) => match next_char {
                Some(c) if c.value.is_ascii_alphanumeric() || c.value == '_' => {
                    LexerStateTransition::Stay
                }
                _ => {
                    let stop = next_char.map(|c| c.offset).unwrap_or(end);
                    let span = Span::new(start, stop);
                    let kind = KEYWORD_HASHMAP
                        .get(&source[span.range()])
                        .copied()
                        .unwrap_or(TokenKind::Ident);
                    LexerStateTransition::emit_before(Ok(Token { kind, span }), *next_char)
                }
            },
            LexerState::Integer(start) => match next_char {
                Some(c) if c.value.is_ascii_digit() => LexerStateTransition::Stay,
                Some(c) if c.value == '.' => {
                    LexerStateTransition::ChangeState(LexerState::IntegerDot { start, dot: *c })
                }
                _ => {
                    let stop = next_char.map(|c| c.offset).unwrap_or(end);
                    LexerStateTransition::emit_before(
                        lex_integer(source, Span::new(start, stop)),
                        *next_char,
                    )
                }
            },
            LexerState::IntegerDot { start, dot } => match next_char {
                Some(c) if c.value.is_ascii_digit() => {
                    LexerStateTransition::ChangeState(LexerState::Fraction(start))
                }
                // The dot does not belong to the number so both characters go back.
                Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBackTwo {
                    new_state: LexerState::Normal,
                    token_or_error: lex_integer(source, Span::new(start, dot.offset)),
                    put_back: (dot, *c),
                },
                None => LexerStateTransition::emit_before(
                    lex_integer(source, Span::new(start, dot.offset)),
                    Some(dot),
                ),
            },
            LexerState::Fraction(start) => match next_char {
                Some(c) if c.value.is_ascii_digit() => LexerStateTransition::Stay,
                _ => {
                    let stop = next_char.map(|c| c.offset).unwrap_or(end);
                    let token = Token {
                        kind: TokenKind::DoubleLiteral,
                        span: Span::new(start, stop),
                    };
                    LexerStateTransition::emit_before(Ok(token), *next_char)
                }
            },
            LexerState::String { start, escaped } => {
                let Some(c) = next_char else {
                    return LexerStateTransition::emit(Err(LexicalError {
                        kind: LexicalErrorKind::UnclosedString,
                        span: Span::new(start, end),
                    }));
                };
                match (escaped, c.value) {
                    (true, _) => LexerStateTransition::ChangeState(LexerState::String {
                        start,
                        escaped: false,
                    }),
                    (false, '\\') => LexerStateTransition::ChangeState(LexerState::String {
                        start,
                        escaped: true,
                    }),
                    (false, '"') => {
                        let span = Span::new(start, c.next_offset());
                        let body = &source[(start + 1usize).to_usize()..c.offset.to_usize()];
                        let token_or_error = match decode_escapes(body) {
                            Ok(_) => Ok(Token {
                                kind: TokenKind::StringLiteral,
                                span,
                            }),
                            Err(escape) => Err(LexicalError {
                                kind: LexicalErrorKind::UnknownEscape(escape),
                                span,
                            }),
                        };
                        LexerStateTransition::emit(token_or_error)
                    }
                    (false, _) => LexerStateTransition::Stay,
                }
            }
            LexerState::Char { start, escaped } => {
                let c = match next_char {
                    Some(c) if c.value != '\n' => c,
                    _ => {
                        let stop = next_char.map(|c| c.offset).unwrap_or(end);
                        return LexerStateTransition::emit_before(
                            Err(LexicalError {
                                kind: LexicalErrorKind::UnclosedChar,
                                span: Span::new(start, stop),
                            }),
                            *next_char,
                        );
                    }
                };
                match (escaped, c.value) {
                    (true, _) => LexerStateTransition::ChangeState(LexerState::Char {
                        start,
                        escaped: false,
                    }),
                    (false, '\\') => LexerStateTransition::ChangeState(LexerState::Char {
                        start,
                        escaped: true,
                    }),
                    (false, '\'') => {
                        let span = Span::new(start, c.next_offset());
                        let body = &source[(start + 1usize).to_usize()..c.offset.to_usize()];
                        let token_or_error = match decode_escapes(body) {
                            Ok(decoded) if decoded.chars().count() == 1 => Ok(Token {
                                kind: TokenKind::CharLiteral,
                                span,
                            }),
                            Ok(_) => Err(LexicalError {
                                kind: LexicalErrorKind::InvalidChar,
                                span,
                            }),
                            Err(escape) => Err(LexicalError {
                                kind: LexicalErrorKind::UnknownEscape(escape),
                                span,
                            }),
                        };
                        LexerStateTransition::emit(token_or_error)
                    }
                    (false, _) => LexerStateTransition::Stay,
                }
            }
        }
    }
}

fn eof(end: SpanIndex) -> Token {
    Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    }
}

fn lex_integer(source: &str, span: Span) -> Result<Token, LexicalError> {
    match source[span.range()].parse::<i64>() {
        Ok(_) => Ok(Token {
            kind: TokenKind::IntegerLiteral,
            span,
        }),
        Err(_) => Err(LexicalError {
            kind: LexicalErrorKind::IntegerOverflow,
            span,
        }),
    }
}

fn execute_normal(end: SpanIndex, next_char: &Option<SourceChar>) -> LexerStateTransition {
    let Some(c) = *next_char else {
        return LexerStateTransition::emit(Ok(eof(end)));
    };
    let start = c.offset;

    let just = move |kind: TokenKind| {
        LexerStateTransition::emit(Ok(Token {
            kind,
            span: Span::new(start, c.next_offset()),
        }))
    };

    match c.value {
        // Single character tokens
        '(' => just(TokenKind::LeftParenthesis),
        ')' => just(TokenKind::RightParenthesis),
        '{' => just(TokenKind::LeftBrace),
        '}' => just(TokenKind::RightBrace),
        '[' => just(TokenKind::LeftBracket),
        ']' => just(TokenKind::RightBracket),
        ',' => just(TokenKind::Comma),
        ';' => just(TokenKind::Semicolon),
        '~' => just(TokenKind::Tilde),
        // Possibly two character tokens
        '+' | '-' | '*' | '/' | '%' | '!' | '=' | '<' | '>' | '&' | '|' => {
            LexerStateTransition::ChangeState(LexerState::Operator(c))
        }
        // Literals
        '"' => LexerStateTransition::ChangeState(LexerState::String {
            start,
            escaped: false,
        }),
        '\'' => LexerStateTransition::ChangeState(LexerState::Char {
            start,
            escaped: false,
        }),
        '0'..='9' => LexerStateTransition::ChangeState(LexerState::Integer(start)),
        // Identifier/keyword token
        'a'..='z' | 'A'..='Z' | '_' => LexerStateTransition::ChangeState(LexerState::Ident(start)),
        v if v.is_whitespace() => LexerStateTransition::Stay,
        v => LexerStateTransition::emit(Err(LexicalError {
            kind: LexicalErrorKind::Unrecognized(v),
            span: Span::new(start, c.next_offset()),
        })),
    }
}

fn execute_operator(first: SourceChar, next_char: &Option<SourceChar>) -> LexerStateTransition {
    let second = next_char.map(|c| c.value);
    let double = match (first.value, second) {
        ('/', Some('/')) => return LexerStateTransition::ChangeState(LexerState::Comment),
        ('+', Some('=')) => Some(TokenKind::PlusEqual),
        ('-', Some('=')) => Some(TokenKind::MinusEqual),
        ('*', Some('=')) => Some(TokenKind::StarEqual),
        ('/', Some('=')) => Some(TokenKind::SlashEqual),
        ('%', Some('=')) => Some(TokenKind::PercentEqual),
        ('!', Some('=')) => Some(TokenKind::BangEqual),
        ('=', Some('=')) => Some(TokenKind::EqualEqual),
        ('<', Some('=')) => Some(TokenKind::LessThanEqual),
        ('>', Some('=')) => Some(TokenKind::GreaterThanEqual),
        ('&', Some('&')) => Some(TokenKind::AmpersandAmpersand),
        ('|', Some('|')) => Some(TokenKind::PipePipe),
        _ => None,
    };

    if let (Some(kind), Some(second)) = (double, next_char) {
        return LexerStateTransition::emit(Ok(Token {
            kind,
            span: Span::new(first.offset, second.next_offset()),
        }));
    }

    let kind = match first.value {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '!' => TokenKind::Bang,
        '=' => TokenKind::Equal,
        '<' => TokenKind::LessThan,
        '>' => TokenKind::GreaterThan,
        '&' => TokenKind::Ampersand,
        _ => TokenKind::Pipe,
    };
    let token = Token {
        kind,
        span: Span::new(first.offset, first.next_offset()),
    };
    LexerStateTransition::emit_before(Ok(token), *next_char)
}
