/// Try to get a keyword from a string, ignoring string casing.
pub fn keyword_from_str(s: &str) -> Option<Keyword> {
    let s = unicase::Ascii::new(s);
    let idx = match KEYWORD_STRINGS.binary_search(&s) {
        Ok(idx) => idx,
        Err(_) => return None,
    };
    Some(ALL_KEYWORDS[idx])
}

/// Generate an enum of keywords.
macro_rules! define_keywords {
    ($($ident:ident),*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($ident),*
        }

        pub const ALL_KEYWORDS: &'static [Keyword] = &[
            $(Keyword::$ident),*
        ];

        pub const KEYWORD_STRINGS: &'static [unicase::Ascii<&'static str>] = &[
            $(unicase::Ascii::new(stringify!($ident)),)*
        ];
    };
}

// Keep this list alphabetical, lookup is a binary search.
#[rustfmt::skip]
define_keywords!(
    ALL,
    AND,
    AS,
    ASC,
    BETWEEN,
    BIGINT,
    BOOLEAN,
    BY,
    CREATE,
    CROSS,
    CURRENT,
    DEFAULT,
    DESC,
    DOUBLE,
    DROP,
    EXCEPT,
    EXISTS,
    FALSE,
    FOLLOWING,
    FROM,
    FULL,
    GROUP,
    HAVING,
    IF,
    IN,
    INNER,
    INSERT,
    INT,
    INTEGER,
    INTERSECT,
    INTO,
    JOIN,
    KEY,
    LEFT,
    LIMIT,
    NATURAL,
    NOT,
    NULL,
    OFFSET,
    ON,
    OR,
    ORDER,
    OUTER,
    OVER,
    PARTITION,
    PRECEDING,
    PRIMARY,
    RANGE,
    RIGHT,
    ROW,
    ROWS,
    SELECT,
    SMALLINT,
    TABLE,
    TEXT,
    TRUE,
    UNBOUNDED,
    UNION,
    USING,
    VALUES,
    VARCHAR,
    WHERE
);

/// Keywords that may not follow an expression in the select list without an
/// explicit AS when used as a column alias.
pub const RESERVED_FOR_COLUMN_ALIAS: &[Keyword] = &[
    Keyword::FROM,
    Keyword::WHERE,
    Keyword::GROUP,
    Keyword::HAVING,
    Keyword::ORDER,
    Keyword::LIMIT,
    Keyword::OFFSET,
    Keyword::UNION,
    Keyword::EXCEPT,
    Keyword::INTERSECT,
];

/// Keywords that may not follow a table factor without an explicit AS when
/// used as a table alias.
pub const RESERVED_FOR_TABLE_ALIAS: &[Keyword] = &[
    Keyword::WHERE,
    Keyword::GROUP,
    Keyword::HAVING,
    Keyword::ORDER,
    Keyword::LIMIT,
    Keyword::OFFSET,
    Keyword::UNION,
    Keyword::EXCEPT,
    Keyword::INTERSECT,
    Keyword::JOIN,
    Keyword::INNER,
    Keyword::LEFT,
    Keyword::RIGHT,
    Keyword::FULL,
    Keyword::CROSS,
    Keyword::NATURAL,
    Keyword::ON,
    Keyword::USING,
];
