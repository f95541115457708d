//! Read-only and mutating walks over parsed statements.
//!
//! The walk order is the textual clause order, so literal-collecting visitors
//! see constants in the order a reader of the SQL would.

use crate::statement::Statement;

use super::{
    ColumnDef,
    Expr,
    FrameBound,
    FromNode,
    FromNodeBody,
    GroupByNode,
    Insert,
    JoinCondition,
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

pub trait AstVisitor {
    fn visit_literal(&mut self, _literal: &Literal) {}
    fn visit_parameter(&mut self, _parameter: &Parameter) {}
}

pub fn walk_statement<V: AstVisitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::Query(query) => walk_query(visitor, query),
        Statement::Insert(insert) => walk_insert(visitor, insert),
        Statement::CreateTable(create) => {
            for column in &create.columns {
                walk_column_def(visitor, column);
            }
        }
        Statement::DropTable(_) => {}
    }
}

pub fn walk_query<V: AstVisitor + ?Sized>(visitor: &mut V, query: &QueryNode) {
    walk_query_body(visitor, &query.body);
    for order_by in &query.order_by {
        walk_order_by(visitor, order_by);
    }
    walk_limit(visitor, &query.limit);
}

pub fn walk_query_body<V: AstVisitor + ?Sized>(visitor: &mut V, body: &QueryNodeBody) {
    match body {
        QueryNodeBody::Select(select) => walk_select(visitor, select),
        QueryNodeBody::Nested(body) => walk_query_body(visitor, body),
        QueryNodeBody::Set { left, right, .. } => {
            walk_query_body(visitor, left);
            walk_query_body(visitor, right);
        }
        QueryNodeBody::Values(values) => walk_values(visitor, values),
    }
}

pub fn walk_select<V: AstVisitor + ?Sized>(visitor: &mut V, select: &SelectNode) {
    for projection in &select.projections {
        match projection {
            SelectExpr::Expr(expr) | SelectExpr::AliasedExpr(expr, _) => walk_expr(visitor, expr),
            SelectExpr::QualifiedWildcard(_) | SelectExpr::Wildcard => {}
        }
    }
    if let Some(from) = &select.from {
        walk_from(visitor, from);
    }
    if let Some(where_expr) = &select.where_expr {
        walk_expr(visitor, where_expr);
    }
    match &select.group_by {
        Some(GroupByNode::Exprs { exprs }) => {
            for expr in exprs {
                walk_expr(visitor, expr);
            }
        }
        Some(GroupByNode::All) | None => {}
    }
    if let Some(having) = &select.having {
        walk_expr(visitor, having);
    }
}

pub fn walk_from<V: AstVisitor + ?Sized>(visitor: &mut V, from: &FromNode) {
    match &from.body {
        FromNodeBody::BaseTable { .. } => {}
        FromNodeBody::Subquery { query } => walk_query(visitor, query),
        FromNodeBody::Join(join) => {
            walk_from(visitor, &join.left);
            walk_from(visitor, &join.right);
            visitor.visit_literal(&join.flags.natural);
            visitor.visit_literal(&join.flags.kind);
            visitor.visit_literal(&join.flags.qualifier);
            match &join.condition {
                JoinCondition::On(expr) => walk_expr(visitor, expr),
                JoinCondition::Using(_) | JoinCondition::Natural | JoinCondition::None => {}
            }
        }
    }
}

pub fn walk_insert<V: AstVisitor + ?Sized>(visitor: &mut V, insert: &Insert) {
    walk_query(visitor, &insert.source);
}

pub fn walk_column_def<V: AstVisitor + ?Sized>(visitor: &mut V, column: &ColumnDef) {
    if let Some(default) = &column.default {
        walk_expr(visitor, default);
    }
}

fn walk_values<V: AstVisitor + ?Sized>(visitor: &mut V, values: &Values) {
    for row in &values.rows {
        for expr in row {
            walk_expr(visitor, expr);
        }
    }
}

fn walk_order_by<V: AstVisitor + ?Sized>(visitor: &mut V, order_by: &OrderByNode) {
    walk_expr(visitor, &order_by.expr);
}

fn walk_limit<V: AstVisitor + ?Sized>(visitor: &mut V, limit: &LimitModifier) {
    if let Some(expr) = &limit.limit {
        walk_expr(visitor, expr);
    }
    if let Some(expr) = &limit.offset {
        walk_expr(visitor, expr);
    }
}

pub fn walk_expr<V: AstVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Ident(_) | Expr::CompoundIdent(_) => {}
        Expr::Literal(literal) => visitor.visit_literal(literal),
        Expr::Parameter(parameter) => visitor.visit_parameter(parameter),
        Expr::UnaryExpr { expr, .. } => walk_expr(visitor, expr),
        Expr::BinaryExpr { left, right, .. } => {
            walk_expr(visitor, left);
            walk_expr(visitor, right);
        }
        Expr::Nested(expr) => walk_expr(visitor, expr),
        Expr::Function(function) => {
            for arg in &function.args {
                walk_expr(visitor, arg);
            }
            if let Some(over) = &function.over {
                walk_window(visitor, over);
            }
        }
        Expr::InList { expr, list, .. } => {
            walk_expr(visitor, expr);
            for item in list {
                walk_expr(visitor, item);
            }
        }
        Expr::Subquery(query) => walk_query(visitor, query),
        Expr::Exists { subquery, .. } => walk_query(visitor, subquery),
    }
}

pub fn walk_window<V: AstVisitor + ?Sized>(visitor: &mut V, window: &WindowSpec) {
    for expr in &window.partition_by {
        walk_expr(visitor, expr);
    }
    for order_by in &window.order_by {
        walk_order_by(visitor, order_by);
    }
    if let Some(frame) = &window.frame {
        walk_frame(visitor, frame);
    }
    visitor.visit_literal(&window.allow_partial);
}

fn walk_frame<V: AstVisitor + ?Sized>(visitor: &mut V, frame: &WindowFrame) {
    walk_frame_bound(visitor, &frame.start);
    if let Some(end) = &frame.end {
        walk_frame_bound(visitor, end);
    }
}

fn walk_frame_bound<V: AstVisitor + ?Sized>(visitor: &mut V, bound: &FrameBound) {
    match bound {
        FrameBound::UnboundedPreceding
        | FrameBound::UnboundedFollowing
        | FrameBound::CurrentRow => {}
        FrameBound::Preceding(expr) | FrameBound::Following(expr) => walk_expr(visitor, expr),
    }
}

/// A mutating walk over every expression in a statement.
///
/// The visitor is called on an expression before its children, so a visitor
/// that replaces a node won't descend into the replaced subtree.
pub trait AstVisitorMut {
    fn visit_expr_mut(&mut self, _expr: &mut Expr) {}
}

pub fn walk_statement_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Query(query) => walk_query_mut(visitor, query),
        Statement::Insert(insert) => walk_query_mut(visitor, &mut insert.source),
        Statement::CreateTable(create) => {
            for column in &mut create.columns {
                if let Some(default) = &mut column.default {
                    walk_expr_mut(visitor, default);
                }
            }
        }
        Statement::DropTable(_) => {}
    }
}

pub fn walk_query_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, query: &mut QueryNode) {
    walk_query_body_mut(visitor, &mut query.body);
    for order_by in &mut query.order_by {
        walk_expr_mut(visitor, &mut order_by.expr);
    }
    if let Some(expr) = &mut query.limit.limit {
        walk_expr_mut(visitor, expr);
    }
    if let Some(expr) = &mut query.limit.offset {
        walk_expr_mut(visitor, expr);
    }
}

fn walk_query_body_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, body: &mut QueryNodeBody) {
    match body {
        QueryNodeBody::Select(select) => walk_select_mut(visitor, select),
        QueryNodeBody::Nested(body) => walk_query_body_mut(visitor, body),
        QueryNodeBody::Set { left, right, .. } => {
            walk_query_body_mut(visitor, left);
            walk_query_body_mut(visitor, right);
        }
        QueryNodeBody::Values(values) => {
            for row in &mut values.rows {
                for expr in row {
                    walk_expr_mut(visitor, expr);
                }
            }
        }
    }
}

fn walk_select_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, select: &mut SelectNode) {
    for projection in &mut select.projections {
        match projection {
            SelectExpr::Expr(expr) | SelectExpr::AliasedExpr(expr, _) => {
                walk_expr_mut(visitor, expr)
            }
            SelectExpr::QualifiedWildcard(_) | SelectExpr::Wildcard => {}
        }
    }
    if let Some(from) = &mut select.from {
        walk_from_mut(visitor, from);
    }
    if let Some(where_expr) = &mut select.where_expr {
        walk_expr_mut(visitor, where_expr);
    }
    if let Some(GroupByNode::Exprs { exprs }) = &mut select.group_by {
        for expr in exprs {
            walk_expr_mut(visitor, expr);
        }
    }
    if let Some(having) = &mut select.having {
        walk_expr_mut(visitor, having);
    }
}

fn walk_from_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, from: &mut FromNode) {
    match &mut from.body {
        FromNodeBody::BaseTable { .. } => {}
        FromNodeBody::Subquery { query } => walk_query_mut(visitor, query),
        FromNodeBody::Join(join) => {
            walk_from_mut(visitor, &mut join.left);
            walk_from_mut(visitor, &mut join.right);
            if let JoinCondition::On(expr) = &mut join.condition {
                walk_expr_mut(visitor, expr);
            }
        }
    }
}

pub fn walk_expr_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    visitor.visit_expr_mut(expr);
    match expr {
        Expr::Ident(_) | Expr::CompoundIdent(_) | Expr::Literal(_) | Expr::Parameter(_) => {}
        Expr::UnaryExpr { expr, .. } => walk_expr_mut(visitor, expr),
        Expr::BinaryExpr { left, right, .. } => {
            walk_expr_mut(visitor, left);
            walk_expr_mut(visitor, right);
        }
        Expr::Nested(expr) => walk_expr_mut(visitor, expr),
        Expr::Function(function) => {
            for arg in &mut function.args {
                walk_expr_mut(visitor, arg);
            }
            if let Some(over) = &mut function.over {
                for expr in &mut over.partition_by {
                    walk_expr_mut(visitor, expr);
                }
                for order_by in &mut over.order_by {
                    walk_expr_mut(visitor, &mut order_by.expr);
                }
                if let Some(frame) = &mut over.frame {
                    walk_frame_bound_mut(visitor, &mut frame.start);
                    if let Some(end) = &mut frame.end {
                        walk_frame_bound_mut(visitor, end);
                    }
                }
            }
        }
        Expr::InList { expr, list, .. } => {
            walk_expr_mut(visitor, expr);
            for item in list {
                walk_expr_mut(visitor, item);
            }
        }
        Expr::Subquery(query) => walk_query_mut(visitor, query),
        Expr::Exists { subquery, .. } => walk_query_mut(visitor, subquery),
    }
}

fn walk_frame_bound_mut<V: AstVisitorMut + ?Sized>(visitor: &mut V, bound: &mut FrameBound) {
    match bound {
        FrameBound::UnboundedPreceding
        | FrameBound::UnboundedFollowing
        | FrameBound::CurrentRow => {}
        FrameBound::Preceding(expr) | FrameBound::Following(expr) => walk_expr_mut(visitor, expr),
    }
}

/// Whether any dynamic parameter marker appears in the statement.
pub fn contains_parameters(statement: &Statement) -> bool {
    struct Finder {
        found: bool,
    }
    impl AstVisitor for Finder {
        fn visit_parameter(&mut self, _parameter: &Parameter) {
            self.found = true;
        }
    }

    let mut finder = Finder { found: false };
    walk_statement(&mut finder, statement);
    finder.found
}

/// Count every literal in the statement, including ones the parser
/// materialized itself.
pub fn count_literals(statement: &Statement) -> usize {
    struct Counter {
        count: usize,
    }
    impl AstVisitor for Counter {
        fn visit_literal(&mut self, _literal: &Literal) {
            self.count += 1;
        }
    }

    let mut counter = Counter { count: 0 };
    walk_statement(&mut counter, statement);
    counter.count
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse;

    fn parse_one(sql: &str) -> Statement {
        let mut statements = parse(sql).unwrap();
        assert_eq!(1, statements.len());
        statements.pop().unwrap()
    }

    #[test]
    fn collect_literals_in_text_order() {
        let statement = parse_one(
            "select * from t where id = 7 and name = 'Chao' limit 2 offset 3",
        );

        struct Collector {
            literals: Vec<Literal>,
        }
        impl AstVisitor for Collector {
            fn visit_literal(&mut self, literal: &Literal) {
                self.literals.push(literal.clone());
            }
        }

        let mut collector = Collector {
            literals: Vec::new(),
        };
        walk_statement(&mut collector, &statement);

        let expected = vec![
            Literal::Number("7".to_string()),
            Literal::SingleQuotedString("Chao".to_string()),
            Literal::Number("2".to_string()),
            Literal::Number("3".to_string()),
        ];
        assert_eq!(expected, collector.literals);
    }

    #[test]
    fn join_flags_are_visited() {
        // One comparison literal plus the three join shape literals.
        let statement = parse_one("select * from t1 join t2 on t1.a = t2.a where t1.b = 1");
        assert_eq!(4, count_literals(&statement));
    }

    #[test]
    fn window_flag_is_visited() {
        let statement = parse_one("select rank() over (partition by a order by b) from t");
        assert_eq!(1, count_literals(&statement));
    }

    #[test]
    fn ddl_default_is_visited() {
        let statement = parse_one("create table t1 (a int default 1, b text)");
        assert_eq!(1, count_literals(&statement));
    }

    #[test]
    fn finds_parameters() {
        assert!(contains_parameters(&parse_one("select * from t where a = ?")));
        assert!(!contains_parameters(&parse_one("select * from t where a = 1")));
    }
}
