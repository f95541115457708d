//! The literal-displacing rewrite.
//!
//! Rebuilds a statement with every user constant replaced by a numbered
//! parameter marker, collecting the constants in the order they're displaced.
//! The rebuild follows textual clause order, so marker ordinals line up with
//! how a `?` in the same position would have been numbered by the parser.

use parser::ast::{
    ColumnDef,
    CreateTable,
    Expr,
    FrameBound,
    FromJoin,
    FromNode,
    FromNodeBody,
    Function,
    GroupByNode,
    Insert,
    JoinCondition,
    JoinFlags,
    LimitModifier,
    Literal,
    OrderByNode,
    Parameter,
    QueryNode,
    QueryNodeBody,
    SelectExpr,
    SelectNode,
    Values,
    WindowFrame,
    WindowSpec,
};
use parser::statement::Statement;

use crate::classify::{LiteralClass, LiteralRole, classify_literal};

#[derive(Debug)]
pub struct Parameterizer {
    literals: Vec<Literal>,
}

impl Parameterizer {
    /// Rewrite a statement into its canonical literal-free form, returning
    /// the rewritten statement and the displaced literals in marker order.
    pub fn rewrite(statement: &Statement) -> (Statement, Vec<Literal>) {
        let mut parameterizer = Parameterizer {
            literals: Vec::new(),
        };
        let statement = parameterizer.rewrite_statement(statement);
        (statement, parameterizer.literals)
    }

    /// Displace a user literal, returning the marker that takes its place.
    fn marker(&mut self, literal: &Literal) -> Expr {
        let type_hint = literal.type_hint();
        self.literals.push(literal.clone());
        Expr::Parameter(Parameter {
            ordinal: self.literals.len(),
            type_hint: Some(type_hint),
        })
    }

    /// Keep a structural literal in place.
    fn keep_literal(&self, literal: &Literal, role: LiteralRole) -> Literal {
        debug_assert_eq!(LiteralClass::Structural, classify_literal(literal, role));
        literal.clone()
    }

    fn rewrite_statement(&mut self, statement: &Statement) -> Statement {
        match statement {
            Statement::Query(query) => Statement::Query(self.rewrite_query(query)),
            Statement::Insert(insert) => Statement::Insert(Insert {
                table: insert.table.clone(),
                columns: insert.columns.clone(),
                source: self.rewrite_query(&insert.source),
            }),
            Statement::CreateTable(create) => Statement::CreateTable(CreateTable {
                name: create.name.clone(),
                if_not_exists: create.if_not_exists,
                columns: create
                    .columns
                    .iter()
                    .map(|column| self.rewrite_column_def(column))
                    .collect(),
            }),
            Statement::DropTable(drop) => Statement::DropTable(drop.clone()),
        }
    }

    fn rewrite_query(&mut self, query: &QueryNode) -> QueryNode {
        QueryNode {
            body: self.rewrite_query_body(&query.body),
            order_by: query
                .order_by
                .iter()
                .map(|order_by| self.rewrite_order_by(order_by))
                .collect(),
            limit: LimitModifier {
                limit: query
                    .limit
                    .limit
                    .as_ref()
                    .map(|expr| self.rewrite_expr(expr, LiteralRole::LimitOffset)),
                offset: query
                    .limit
                    .offset
                    .as_ref()
                    .map(|expr| self.rewrite_expr(expr, LiteralRole::LimitOffset)),
            },
        }
    }

    fn rewrite_query_body(&mut self, body: &QueryNodeBody) -> QueryNodeBody {
        match body {
            QueryNodeBody::Select(select) => {
                QueryNodeBody::Select(Box::new(self.rewrite_select(select)))
            }
            QueryNodeBody::Nested(body) => {
                QueryNodeBody::Nested(Box::new(self.rewrite_query_body(body)))
            }
            QueryNodeBody::Set {
                left,
                right,
                operation,
                all,
            } => QueryNodeBody::Set {
                left: Box::new(self.rewrite_query_body(left)),
                right: Box::new(self.rewrite_query_body(right)),
                operation: *operation,
                all: *all,
            },
            QueryNodeBody::Values(values) => QueryNodeBody::Values(Values {
                rows: values
                    .rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|expr| self.rewrite_expr(expr, LiteralRole::ValuesRow))
                            .collect()
                    })
                    .collect(),
            }),
        }
    }

    fn rewrite_select(&mut self, select: &SelectNode) -> SelectNode {
        SelectNode {
            projections: select
                .projections
                .iter()
                .map(|projection| match projection {
                    SelectExpr::Expr(expr) => {
                        SelectExpr::Expr(self.rewrite_expr(expr, LiteralRole::Scalar))
                    }
                    SelectExpr::AliasedExpr(expr, alias) => SelectExpr::AliasedExpr(
                        self.rewrite_expr(expr, LiteralRole::Scalar),
                        alias.clone(),
                    ),
                    other => other.clone(),
                })
                .collect(),
            from: select.from.as_ref().map(|from| self.rewrite_from(from)),
            where_expr: select
                .where_expr
                .as_ref()
                .map(|expr| self.rewrite_expr(expr, LiteralRole::Scalar)),
            group_by: select.group_by.as_ref().map(|group_by| match group_by {
                GroupByNode::All => GroupByNode::All,
                GroupByNode::Exprs { exprs } => GroupByNode::Exprs {
                    exprs: exprs
                        .iter()
                        .map(|expr| self.rewrite_expr(expr, LiteralRole::Scalar))
                        .collect(),
                },
            }),
            having: select
                .having
                .as_ref()
                .map(|expr| self.rewrite_expr(expr, LiteralRole::Scalar)),
        }
    }

    fn rewrite_from(&mut self, from: &FromNode) -> FromNode {
        let body = match &from.body {
            FromNodeBody::BaseTable { reference } => FromNodeBody::BaseTable {
                reference: reference.clone(),
            },
            FromNodeBody::Subquery { query } => FromNodeBody::Subquery {
                query: Box::new(self.rewrite_query(query)),
            },
            FromNodeBody::Join(join) => FromNodeBody::Join(FromJoin {
                left: Box::new(self.rewrite_from(&join.left)),
                right: Box::new(self.rewrite_from(&join.right)),
                flags: JoinFlags {
                    natural: self.keep_literal(&join.flags.natural, LiteralRole::JoinFlag),
                    kind: self.keep_literal(&join.flags.kind, LiteralRole::JoinFlag),
                    qualifier: self.keep_literal(&join.flags.qualifier, LiteralRole::JoinFlag),
                },
                condition: match &join.condition {
                    JoinCondition::On(expr) => {
                        JoinCondition::On(self.rewrite_expr(expr, LiteralRole::Scalar))
                    }
                    other => other.clone(),
                },
            }),
        };
        FromNode {
            alias: from.alias.clone(),
            body,
        }
    }

    fn rewrite_order_by(&mut self, order_by: &OrderByNode) -> OrderByNode {
        OrderByNode {
            expr: self.rewrite_expr(&order_by.expr, LiteralRole::Scalar),
            sort: order_by.sort,
        }
    }

    fn rewrite_expr(&mut self, expr: &Expr, role: LiteralRole) -> Expr {
        match expr {
            Expr::Ident(_) | Expr::CompoundIdent(_) => expr.clone(),
            Expr::Literal(literal) => match classify_literal(literal, role) {
                LiteralClass::User => self.marker(literal),
                LiteralClass::Structural => Expr::Literal(literal.clone()),
            },
            // Callers reject statements that already have markers before
            // rewriting, so this is unreachable in practice.
            Expr::Parameter(_) => expr.clone(),
            Expr::UnaryExpr { op, expr } => Expr::UnaryExpr {
                op: *op,
                expr: Box::new(self.rewrite_expr(expr, role)),
            },
            Expr::BinaryExpr { left, op, right } => Expr::BinaryExpr {
                left: Box::new(self.rewrite_expr(left, role)),
                op: *op,
                right: Box::new(self.rewrite_expr(right, role)),
            },
            Expr::Nested(expr) => Expr::Nested(Box::new(self.rewrite_expr(expr, role))),
            Expr::Function(function) => Expr::Function(Function {
                reference: function.reference.clone(),
                args: function
                    .args
                    .iter()
                    .map(|arg| self.rewrite_expr(arg, role))
                    .collect(),
                over: function.over.as_ref().map(|over| self.rewrite_window(over)),
            }),
            Expr::InList {
                expr,
                list,
                negated,
            } => Expr::InList {
                expr: Box::new(self.rewrite_expr(expr, role)),
                list: list
                    .iter()
                    .map(|item| self.rewrite_expr(item, role))
                    .collect(),
                negated: *negated,
            },
            Expr::Subquery(query) => Expr::Subquery(Box::new(self.rewrite_query(query))),
            Expr::Exists {
                subquery,
                not_exists,
            } => Expr::Exists {
                subquery: Box::new(self.rewrite_query(subquery)),
                not_exists: *not_exists,
            },
        }
    }

    fn rewrite_window(&mut self, window: &WindowSpec) -> WindowSpec {
        WindowSpec {
            partition_by: window
                .partition_by
                .iter()
                .map(|expr| self.rewrite_expr(expr, LiteralRole::Scalar))
                .collect(),
            order_by: window
                .order_by
                .iter()
                .map(|order_by| self.rewrite_order_by(order_by))
                .collect(),
            frame: window.frame.as_ref().map(|frame| WindowFrame {
                units: frame.units,
                start: self.rewrite_frame_bound(&frame.start),
                end: frame
                    .end
                    .as_ref()
                    .map(|bound| self.rewrite_frame_bound(bound)),
            }),
            allow_partial: self.keep_literal(&window.allow_partial, LiteralRole::WindowFlag),
        }
    }

    fn rewrite_frame_bound(&mut self, bound: &FrameBound) -> FrameBound {
        match bound {
            FrameBound::Preceding(expr) => {
                FrameBound::Preceding(Box::new(self.rewrite_expr(expr, LiteralRole::FrameBound)))
            }
            FrameBound::Following(expr) => {
                FrameBound::Following(Box::new(self.rewrite_expr(expr, LiteralRole::FrameBound)))
            }
            other => other.clone(),
        }
    }

    fn rewrite_column_def(&mut self, column: &ColumnDef) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            datatype: column.datatype.clone(),
            default: column
                .default
                .as_ref()
                .map(|expr| self.rewrite_expr(expr, LiteralRole::DdlDefault)),
            not_null: column.not_null,
            primary_key: column.primary_key,
        }
    }
}
