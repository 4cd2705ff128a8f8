use std::fmt;

use crate::TokenKind;

/// The five concrete variable types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Double,
    Boolean,
    Char,
    String,
}

impl VarType {
    pub const ALL: [VarType; 5] = [
        VarType::Int,
        VarType::Double,
        VarType::Boolean,
        VarType::Char,
        VarType::String,
    ];

    /// Maps a type keyword to its variable type.
    pub fn from_keyword(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Int => Some(VarType::Int),
            TokenKind::Double => Some(VarType::Double),
            TokenKind::Boolean => Some(VarType::Boolean),
            TokenKind::Char => Some(VarType::Char),
            TokenKind::String => Some(VarType::String),
            _ => None,
        }
    }

    pub fn keyword(self) -> TokenKind {
        match self {
            VarType::Int => TokenKind::Int,
            VarType::Double => TokenKind::Double,
            VarType::Boolean => TokenKind::Boolean,
            VarType::Char => TokenKind::Char,
            VarType::String => TokenKind::String,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarType::Int => "int",
            VarType::Double => "double",
            VarType::Boolean => "boolean",
            VarType::Char => "char",
            VarType::String => "String",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for ty in VarType::ALL {
            assert_eq!(VarType::from_keyword(ty.keyword()), Some(ty));
            assert!(ty.keyword().is_type_keyword());
        }
        assert_eq!(VarType::from_keyword(TokenKind::Void), None);
        assert_eq!(VarType::from_keyword(TokenKind::Identifier), None);
    }
}
