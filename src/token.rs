#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    // Identifiers
    Ident(String),
    // Type keywords
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    StringType,
    Bool,
    Void,
    // Statement keywords
    If,
    Else,
    While,
    For,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    True,
    False,
    // Operators
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    Assign,      // =
    PlusAssign,  // +=
    MinusAssign, // -=
    StarAssign,  // *=
    SlashAssign, // /=
    Eq,          // ==
    Neq,         // !=
    Lt,          // <
    Gt,          // >
    Lte,         // <=
    Gte,         // >=
    And,         // &&
    Or,          // ||
    Bang,        // !
    BitAnd,      // &
    BitOr,       // |
    BitXor,      // ^
    BitNot,      // ~
    Shl,         // <<
    Shr,         // >>
    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Colon,     // :
    Question,  // ?
    // Sentinels
    Eof,
    Unknown(String),
}

impl TokenKind {
    /// True for the twelve base-type keywords.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Int8
                | TokenKind::UInt8
                | TokenKind::Int16
                | TokenKind::UInt16
                | TokenKind::Int32
                | TokenKind::UInt32
                | TokenKind::Int64
                | TokenKind::UInt64
                | TokenKind::Double
                | TokenKind::StringType
                | TokenKind::Bool
                | TokenKind::Void
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}
