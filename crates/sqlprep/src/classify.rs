//! Splitting literals into user constants and structural constants.
//!
//! A user constant is text the user wrote and could plausibly vary between
//! otherwise identical queries, so displacing it with a marker lets the
//! queries share a plan. A structural constant shapes the plan itself: join
//! flags, window behavior flags, frame bounds, column defaults. Displacing
//! one of those would merge queries that need different plans.

use parser::ast::Literal;

/// Where in the statement a literal was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralRole {
    /// A literal inside an ordinary expression: projection, predicate,
    /// grouping, ordering, or function argument.
    Scalar,
    /// A literal in a VALUES row.
    ValuesRow,
    /// A LIMIT or OFFSET count.
    LimitOffset,
    /// A window frame bound offset, e.g. the 2 in `2 PRECEDING`.
    FrameBound,
    /// A window behavior flag materialized by the parser.
    WindowFlag,
    /// A join shape flag materialized by the parser.
    JoinFlag,
    /// A DEFAULT expression in a column definition.
    DdlDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralClass {
    /// Written by the user, safe to displace with a marker.
    User,
    /// Part of the statement's structure, must stay in the tree.
    Structural,
}

/// Classify a literal given where it appeared.
///
/// Symbols never come from user text, so they're structural no matter the
/// role.
pub fn classify_literal(literal: &Literal, role: LiteralRole) -> LiteralClass {
    if literal.is_synthesized() {
        return LiteralClass::Structural;
    }
    match role {
        LiteralRole::Scalar | LiteralRole::ValuesRow | LiteralRole::LimitOffset => {
            LiteralClass::User
        }
        LiteralRole::FrameBound
        | LiteralRole::WindowFlag
        | LiteralRole::JoinFlag
        | LiteralRole::DdlDefault => LiteralClass::Structural,
    }
}

#[cfg(test)]
mod tests {
    use parser::ast::Symbol;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn classification() {
        // (literal, role, expected)
        let tests = [
            (
                Literal::Number("7".to_string()),
                LiteralRole::Scalar,
                LiteralClass::User,
            ),
            (
                Literal::SingleQuotedString("Chao".to_string()),
                LiteralRole::ValuesRow,
                LiteralClass::User,
            ),
            (
                Literal::Number("2".to_string()),
                LiteralRole::LimitOffset,
                LiteralClass::User,
            ),
            (
                Literal::Null,
                LiteralRole::Scalar,
                LiteralClass::User,
            ),
            (
                Literal::Number("2".to_string()),
                LiteralRole::FrameBound,
                LiteralClass::Structural,
            ),
            (
                Literal::Boolean(false),
                LiteralRole::WindowFlag,
                LiteralClass::Structural,
            ),
            (
                Literal::Boolean(false),
                LiteralRole::JoinFlag,
                LiteralClass::Structural,
            ),
            (
                Literal::Number("1".to_string()),
                LiteralRole::DdlDefault,
                LiteralClass::Structural,
            ),
            // Symbols are structural even in a user role.
            (
                Literal::Symbol(Symbol::Inner),
                LiteralRole::Scalar,
                LiteralClass::Structural,
            ),
        ];

        for (literal, role, expected) in tests {
            let got = classify_literal(&literal, role);
            assert_eq!(expected, got, "literal: {literal:?}, role: {role:?}");
        }
    }
}
