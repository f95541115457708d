use parser::ast::Literal;
use parser::ast::visit::count_literals;
use parser::parse;
use parser::statement::Statement;
use pretty_assertions::assert_eq;
use sqlprep::{bind_parameters, prepare};

fn parse_one(sql: &str) -> Statement {
    let mut statements = parse(sql).unwrap();
    assert_eq!(1, statements.len(), "sql: {sql}");
    statements.pop().unwrap()
}

fn num(s: &str) -> Literal {
    Literal::Number(s.to_string())
}

fn string(s: &str) -> Literal {
    Literal::SingleQuotedString(s.to_string())
}

#[test]
fn parameterized_queries() {
    // (input, canonical equivalent, extracted literals)
    let tests = [
        (
            "select * from t where id = 7 and name = 'Chao' and cnt = 566 limit 2 offset 3",
            "select * from t where id = ? and name = ? and cnt = ? limit ? offset ?",
            vec![num("7"), string("Chao"), num("566"), num("2"), num("3")],
        ),
        (
            "insert into t values (1, 'Chao', 2)",
            "insert into t values (?, ?, ?)",
            vec![num("1"), string("Chao"), num("2")],
        ),
        (
            "select * from t where cnt in (1, 3, 5)",
            "select * from t where cnt in (?, ?, ?)",
            vec![num("1"), num("3"), num("5")],
        ),
        (
            "select name, count(id) from t where id > 0 group by name having count(id) > 1",
            "select name, count(id) from t where id > ? group by name having count(id) > ?",
            vec![num("0"), num("1")],
        ),
        (
            "select a + 1, b from t order by b limit 10",
            "select a + ?, b from t order by b limit ?",
            vec![num("1"), num("10")],
        ),
        (
            "select * from t where name = 'it''s' or id = -3",
            "select * from t where name = ? or id = -?",
            vec![string("it's"), num("3")],
        ),
        (
            "select * from t where id = 7 or cnt = 5",
            "select * from t where id = ? or cnt = ?",
            vec![num("7"), num("5")],
        ),
    ];

    for (sql, canonical, expected_literals) in tests {
        let prepared = prepare(sql).unwrap();
        assert!(prepared.is_parameterized(), "sql: {sql}");

        // The rewritten tree is exactly what parsing the marker form gives.
        let expected = parse_one(canonical);
        assert_eq!(&expected, prepared.statement(), "sql: {sql}");

        assert_eq!(
            Some(expected_literals.as_slice()),
            prepared.literals(),
            "sql: {sql}"
        );
    }
}

#[test]
fn window_flag_survives_parameterization() {
    let prepared = prepare("select a, rank() over (partition by a + 1 order by b) from t").unwrap();
    assert!(prepared.is_parameterized());

    // The 1 in the partition expression is extracted; the window's
    // allow-partial flag is the only literal left behind.
    assert_eq!(Some(&[num("1")] as &[Literal]), prepared.literals());
    assert_eq!(1, count_literals(prepared.statement()));

    let expected = parse_one("select a, rank() over (partition by a + ? order by b) from t");
    assert_eq!(&expected, prepared.statement());
}

#[test]
fn windowed_query_with_limit_offset() {
    let prepared =
        prepare("select id, rank() over (partition by cnt + 1 order by name) limit 2 offset 3")
            .unwrap();
    assert!(prepared.is_parameterized());

    // Three markers: partition arithmetic, limit, offset. One structural
    // literal stays.
    assert_eq!(
        Some(&[num("1"), num("2"), num("3")] as &[Literal]),
        prepared.literals()
    );
    assert_eq!(1, count_literals(prepared.statement()));

    let expected = parse_one(
        "select id, rank() over (partition by cnt + ? order by name) limit ? offset ?",
    );
    assert_eq!(&expected, prepared.statement());
}

#[test]
fn join_flags_survive_parameterization() {
    let prepared = prepare("select * from t1 join t2 on t1.a = t2.a where t1.b = 5").unwrap();
    assert!(prepared.is_parameterized());

    assert_eq!(Some(&[num("5")] as &[Literal]), prepared.literals());
    // Natural flag, join kind, and condition qualifier stay in the tree.
    assert_eq!(3, count_literals(prepared.statement()));

    let expected = parse_one("select * from t1 join t2 on t1.a = t2.a where t1.b = ?");
    assert_eq!(&expected, prepared.statement());
}

#[test]
fn literal_free_join_extracts_nothing() {
    let prepared = prepare("select * from t1 natural join t2").unwrap();
    assert!(prepared.is_parameterized());
    assert_eq!(Some(&[] as &[Literal]), prepared.literals());
    assert_eq!(3, count_literals(prepared.statement()));
}

#[test]
fn ddl_is_not_parameterizable() {
    for sql in [
        "create table t1 (a int default 1)",
        "drop table if exists t1",
    ] {
        let prepared = prepare(sql).unwrap();
        assert!(!prepared.is_parameterized(), "sql: {sql}");
        assert_eq!(None, prepared.literals(), "sql: {sql}");
        // Text and tree are untouched.
        assert_eq!(sql, prepared.sql(), "sql: {sql}");
        assert_eq!(&parse_one(sql), prepared.statement(), "sql: {sql}");
    }
}

#[test]
fn marked_statements_are_not_parameterizable() {
    for sql in [
        "select * from t where id = ?",
        "select * from t where id = 7 and cnt < ? and name = 'Chao'",
        "insert into t values (?, 2)",
        "select * from t limit ?",
    ] {
        let prepared = prepare(sql).unwrap();
        assert!(!prepared.is_parameterized(), "sql: {sql}");
        assert_eq!(sql, prepared.sql(), "sql: {sql}");
    }
}

#[test]
fn canonical_text_is_stable() {
    let prepared = prepare("select * from t where id = 7 limit 2 offset 3").unwrap();
    assert_eq!("SELECT * FROM t WHERE id = ? LIMIT ? OFFSET ?", prepared.sql());

    // Preparing the canonical text again changes nothing: it already carries
    // markers, so it comes back as-is.
    let reprepared = prepare(prepared.sql()).unwrap();
    assert!(!reprepared.is_parameterized());
    assert_eq!(prepared.sql(), reprepared.sql());
    assert_eq!(prepared.statement(), reprepared.statement());
}

#[test]
fn offset_written_first_canonicalizes_to_limit_first() {
    let prepared = prepare("select * from t offset 3 limit 2").unwrap();
    assert_eq!("SELECT * FROM t LIMIT ? OFFSET ?", prepared.sql());
    assert_eq!(Some(&[num("2"), num("3")] as &[Literal]), prepared.literals());
}

#[test]
fn bind_restores_original_statement() {
    let queries = [
        "select * from t where id = 7 and name = 'Chao' and cnt = 566 limit 2 offset 3",
        "insert into t values (1, 'Chao', 2)",
        "select * from t where cnt in (1, 3, 5)",
        "select a, rank() over (partition by a + 1 order by b) from t",
        "select * from t1 join t2 on t1.a = t2.a where t1.b = 5",
    ];

    for sql in queries {
        let original = parse_one(sql);
        let prepared = prepare(sql).unwrap();
        let literals = prepared.literals().unwrap();

        let bound = bind_parameters(prepared.statement(), literals).unwrap();
        assert_eq!(original, bound, "sql: {sql}");
    }
}

#[test]
fn subquery_literals_are_extracted() {
    let prepared =
        prepare("select * from t1 where exists (select 1 from t2 where t2.a = 5)").unwrap();
    let expected = parse_one("select * from t1 where exists (select ? from t2 where t2.a = ?)");
    assert_eq!(&expected, prepared.statement());
    assert_eq!(Some(&[num("1"), num("5")] as &[Literal]), prepared.literals());
}

#[test]
fn set_operation_literals_are_extracted() {
    let prepared = prepare("select 1 union all select 2").unwrap();
    let expected = parse_one("select ? union all select ?");
    assert_eq!(&expected, prepared.statement());
    assert_eq!(Some(&[num("1"), num("2")] as &[Literal]), prepared.literals());
}
