//! Node kind tags.
//!
//!     Element 0 of every node on the wire. Downstream evaluators and fixtures key off
//!     these integers, so the values are fixed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Tag {
    Or = 1,
    And = 2,
    Equal = 3,
    NotEqual = 4,
    LessOrEqual = 5,
    LessThan = 6,
    GreaterOrEqual = 7,
    GreaterThan = 8,
    Add = 9,
    Sub = 10,
    Mul = 11,
    Div = 12,
    Mod = 13,
    Negate = 14,
    Not = 15,
    True = 16,
    False = 17,
    Null = 18,
    Int = 101,
    Double = 102,
    String = 103,
    Ternary = 104,
    Selector = 105,
    Call = 106,
    Map = 107,
    Statements = 108,
    Import = 109,
    If = 1000,
    Var = 1001,
    For = 1002,
    Macro = 1003,
}

impl Tag {
    pub const ALL: [Tag; 31] = [
        Tag::Or,
        Tag::And,
        Tag::Equal,
        Tag::NotEqual,
        Tag::LessOrEqual,
        Tag::LessThan,
        Tag::GreaterOrEqual,
        Tag::GreaterThan,
        Tag::Add,
        Tag::Sub,
        Tag::Mul,
        Tag::Div,
        Tag::Mod,
        Tag::Negate,
        Tag::Not,
        Tag::True,
        Tag::False,
        Tag::Null,
        Tag::Int,
        Tag::Double,
        Tag::String,
        Tag::Ternary,
        Tag::Selector,
        Tag::Call,
        Tag::Map,
        Tag::Statements,
        Tag::Import,
        Tag::If,
        Tag::Var,
        Tag::For,
        Tag::Macro,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: i64) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|tag| i64::from(tag.code()) == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Or => "OR",
            Tag::And => "AND",
            Tag::Equal => "EQUAL",
            Tag::NotEqual => "NOT_EQUAL",
            Tag::LessOrEqual => "LESS_OR_EQUAL",
            Tag::LessThan => "LESS_THAN",
            Tag::GreaterOrEqual => "GREATER_OR_EQUAL",
            Tag::GreaterThan => "GREATER_THAN",
            Tag::Add => "ADD",
            Tag::Sub => "SUB",
            Tag::Mul => "MUL",
            Tag::Div => "DIV",
            Tag::Mod => "MOD",
            Tag::Negate => "NEGATE",
            Tag::Not => "NOT",
            Tag::True => "TRUE",
            Tag::False => "FALSE",
            Tag::Null => "NULL",
            Tag::Int => "INT",
            Tag::Double => "DOUBLE",
            Tag::String => "STRING",
            Tag::Ternary => "TERNARY",
            Tag::Selector => "SELECTOR",
            Tag::Call => "CALL",
            Tag::Map => "MAP",
            Tag::Statements => "STATEMENTS",
            Tag::Import => "IMPORT",
            Tag::If => "IF",
            Tag::Var => "VAR",
            Tag::For => "FOR",
            Tag::Macro => "MACRO",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_code(i64::from(tag.code())), Some(tag));
        }
        assert_eq!(Tag::from_code(0), None);
        assert_eq!(Tag::from_code(1004), None);
    }

    #[test]
    fn test_fixed_values() {
        assert_eq!(Tag::Add.code(), 9);
        assert_eq!(Tag::Int.code(), 101);
        assert_eq!(Tag::Import.code(), 109);
        assert_eq!(Tag::Macro.code(), 1003);
    }
}
