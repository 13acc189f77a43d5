/// Spec tests for the lexer.
///
/// Each test verifies that specific source text tokenises to the expected
/// sequence of token kinds. The trailing `Eof` token is filtered out unless
/// the test is specifically about stream structure or positions.
use hostscript::lexer::Lexer;
use hostscript::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lex_tokens(src: &str) -> Vec<Token> {
    Lexer::new(src).tokenize()
}

fn lex_all(src: &str) -> Vec<TokenKind> {
    lex_tokens(src).into_iter().map(|t| t.kind).collect()
}

fn lex(src: &str) -> Vec<TokenKind> {
    lex_all(src)
        .into_iter()
        .filter(|k| !matches!(k, TokenKind::Eof))
        .collect()
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

#[test]
fn int_literal() {
    assert_eq!(lex("42"), vec![TokenKind::Int(42)]);
}

#[test]
fn int_zero() {
    assert_eq!(lex("0"), vec![TokenKind::Int(0)]);
}

#[test]
fn int_large() {
    assert_eq!(lex("9007199254740993"), vec![TokenKind::Int(9007199254740993)]);
}

#[test]
fn float_literal() {
    assert_eq!(lex("3.25"), vec![TokenKind::Float(3.25)]);
}

#[test]
fn float_requires_digit_after_dot() {
    // "1." is an int followed by a stray dot; '.' is not a token of the
    // language.
    assert_eq!(
        lex("1."),
        vec![TokenKind::Int(1), TokenKind::Unknown(".".to_string())]
    );
}

#[test]
fn string_empty() {
    assert_eq!(lex("\"\""), vec![TokenKind::Str(String::new())]);
}

#[test]
fn string_basic() {
    assert_eq!(
        lex("\"hello world\""),
        vec![TokenKind::Str("hello world".to_string())]
    );
}

#[test]
fn string_known_escapes() {
    assert_eq!(
        lex(r#""a\n\t\r\0\"\\b""#),
        vec![TokenKind::Str("a\n\t\r\0\"\\b".to_string())]
    );
}

#[test]
fn string_unknown_escape_keeps_backslash() {
    assert_eq!(lex(r#""\q""#), vec![TokenKind::Str("\\q".to_string())]);
}

#[test]
fn string_unterminated_is_unknown() {
    assert_eq!(
        lex("\"oops"),
        vec![TokenKind::Unknown("\"oops".to_string())]
    );
}

// ---------------------------------------------------------------------------
// Identifiers and keywords
// ---------------------------------------------------------------------------

#[test]
fn ident_simple() {
    assert_eq!(lex("counter"), vec![TokenKind::Ident("counter".to_string())]);
}

#[test]
fn ident_with_underscore_and_digits() {
    assert_eq!(lex("_tmp2"), vec![TokenKind::Ident("_tmp2".to_string())]);
}

#[test]
fn keyword_prefix_is_ident() {
    assert_eq!(lex("iffy"), vec![TokenKind::Ident("iffy".to_string())]);
}

#[test]
fn type_keywords() {
    assert_eq!(
        lex("int8 uint8 int16 uint16 int32 uint32 int64 uint64 double string bool void"),
        vec![
            TokenKind::Int8,
            TokenKind::UInt8,
            TokenKind::Int16,
            TokenKind::UInt16,
            TokenKind::Int32,
            TokenKind::UInt32,
            TokenKind::Int64,
            TokenKind::UInt64,
            TokenKind::Double,
            TokenKind::StringType,
            TokenKind::Bool,
            TokenKind::Void,
        ]
    );
}

#[test]
fn statement_keywords() {
    assert_eq!(
        lex("if else while for do switch case default break continue return true false"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Do,
            TokenKind::Switch,
            TokenKind::Case,
            TokenKind::Default,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::False,
        ]
    );
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[test]
fn greedy_comparison_operators() {
    assert_eq!(
        lex("== = != ! <= < >= >"),
        vec![
            TokenKind::Eq,
            TokenKind::Assign,
            TokenKind::Neq,
            TokenKind::Bang,
            TokenKind::Lte,
            TokenKind::Lt,
            TokenKind::Gte,
            TokenKind::Gt,
        ]
    );
}

#[test]
fn greedy_shift_and_logical_operators() {
    assert_eq!(
        lex("<< >> && & || |"),
        vec![
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::And,
            TokenKind::BitAnd,
            TokenKind::Or,
            TokenKind::BitOr,
        ]
    );
}

#[test]
fn compound_assignment_operators() {
    assert_eq!(
        lex("+= -= *= /= + - * / %"),
        vec![
            TokenKind::PlusAssign,
            TokenKind::MinusAssign,
            TokenKind::StarAssign,
            TokenKind::SlashAssign,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
        ]
    );
}

#[test]
fn adjacent_operators_no_whitespace() {
    // `a<=b` must not lex '<' and '=' separately.
    assert_eq!(
        lex("a<=b"),
        vec![
            TokenKind::Ident("a".to_string()),
            TokenKind::Lte,
            TokenKind::Ident("b".to_string()),
        ]
    );
}

#[test]
fn punctuation() {
    assert_eq!(
        lex("( ) { } [ ] ; , : ? ~ ^"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Question,
            TokenKind::BitNot,
            TokenKind::BitXor,
        ]
    );
}

// ---------------------------------------------------------------------------
// Comments and whitespace
// ---------------------------------------------------------------------------

#[test]
fn line_comment_skipped() {
    assert_eq!(
        lex("1 // everything else\n2"),
        vec![TokenKind::Int(1), TokenKind::Int(2)]
    );
}

#[test]
fn block_comment_skipped() {
    assert_eq!(
        lex("1 /* ignore me */ 2"),
        vec![TokenKind::Int(1), TokenKind::Int(2)]
    );
}

#[test]
fn block_comment_spans_lines() {
    assert_eq!(
        lex("1 /* line one\nline two */ 2"),
        vec![TokenKind::Int(1), TokenKind::Int(2)]
    );
}

#[test]
fn block_comments_do_not_nest() {
    // The comment ends at the first `*/`; the rest is tokenised.
    assert_eq!(
        lex("/* a /* b */ 7"),
        vec![TokenKind::Int(7)]
    );
}

#[test]
fn slash_alone_is_divide() {
    assert_eq!(
        lex("6 / 2"),
        vec![TokenKind::Int(6), TokenKind::Slash, TokenKind::Int(2)]
    );
}

#[test]
fn whitespace_forms_ignored() {
    assert_eq!(
        lex("1 \t\r\n 2"),
        vec![TokenKind::Int(1), TokenKind::Int(2)]
    );
}

// ---------------------------------------------------------------------------
// Unknown input
// ---------------------------------------------------------------------------

#[test]
fn unknown_character() {
    assert_eq!(lex("@"), vec![TokenKind::Unknown("@".to_string())]);
}

#[test]
fn unknown_character_does_not_stop_lexing() {
    assert_eq!(
        lex("1 @ 2"),
        vec![
            TokenKind::Int(1),
            TokenKind::Unknown("@".to_string()),
            TokenKind::Int(2),
        ]
    );
}

// ---------------------------------------------------------------------------
// Stream structure and positions
// ---------------------------------------------------------------------------

#[test]
fn stream_ends_with_eof() {
    let kinds = lex_all("1");
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(lex_all(""), vec![TokenKind::Eof]);
}

#[test]
fn positions_are_one_based() {
    let tokens = lex_tokens("ab cd");
    assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].col), (1, 4));
}

#[test]
fn column_resets_on_newline() {
    let tokens = lex_tokens("a\n  b");
    assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
}

#[test]
fn token_position_is_first_character() {
    let tokens = lex_tokens("  \"hi\"");
    assert_eq!((tokens[0].line, tokens[0].col), (1, 3));
}

#[test]
fn line_counting_through_block_comment() {
    let tokens = lex_tokens("/* a\nb */ x");
    assert_eq!((tokens[0].line, tokens[0].col), (2, 6));
}
