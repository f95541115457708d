use parser::ast::visit::{AstVisitorMut, walk_statement_mut};
use parser::ast::{Expr, Literal};
use parser::statement::Statement;

use crate::errors::{Result, internal};

/// Substitute literals back in for parameter markers.
///
/// Literals are matched to markers by ordinal, so binding the literal list a
/// rewrite extracted back into the rewritten statement reproduces the
/// original statement. Errors if a marker has no literal or a literal has no
/// marker.
pub fn bind_parameters(statement: &Statement, literals: &[Literal]) -> Result<Statement> {
    struct Binder<'a> {
        literals: &'a [Literal],
        bound: usize,
        missing: Option<usize>,
    }

    impl AstVisitorMut for Binder<'_> {
        fn visit_expr_mut(&mut self, expr: &mut Expr) {
            if let Expr::Parameter(parameter) = expr {
                let literal = parameter
                    .ordinal
                    .checked_sub(1)
                    .and_then(|idx| self.literals.get(idx));
                match literal {
                    Some(literal) => {
                        *expr = Expr::Literal(literal.clone());
                        self.bound += 1;
                    }
                    None => {
                        if self.missing.is_none() {
                            self.missing = Some(parameter.ordinal);
                        }
                    }
                }
            }
        }
    }

    let mut bound_statement = statement.clone();
    let mut binder = Binder {
        literals,
        bound: 0,
        missing: None,
    };
    walk_statement_mut(&mut binder, &mut bound_statement);

    if let Some(ordinal) = binder.missing {
        return Err(internal!("No literal provided for parameter {ordinal}"));
    }
    if binder.bound < literals.len() {
        return Err(internal!(
            "Expected {} parameters, statement has {}",
            literals.len(),
            binder.bound
        ));
    }

    Ok(bound_statement)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use parser::parse;

    fn parse_one(sql: &str) -> Statement {
        let mut statements = parse(sql).unwrap();
        assert_eq!(1, statements.len());
        statements.pop().unwrap()
    }

    #[test]
    fn binds_by_ordinal() {
        let statement = parse_one("select * from t where id = ? and name = ?");
        let literals = vec![
            Literal::Number("7".to_string()),
            Literal::SingleQuotedString("Chao".to_string()),
        ];

        let bound = bind_parameters(&statement, &literals).unwrap();
        let expected = parse_one("select * from t where id = 7 and name = 'Chao'");
        assert_eq!(expected, bound);
    }

    #[test]
    fn missing_literal_errors() {
        let statement = parse_one("select * from t where id = ? and name = ?");
        let literals = vec![Literal::Number("7".to_string())];
        bind_parameters(&statement, &literals).unwrap_err();
    }

    #[test]
    fn extra_literal_errors() {
        let statement = parse_one("select * from t where id = ?");
        let literals = vec![
            Literal::Number("7".to_string()),
            Literal::Number("8".to_string()),
        ];
        bind_parameters(&statement, &literals).unwrap_err();
    }
}
