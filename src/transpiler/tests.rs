use pretty_assertions::assert_eq;

use super::*;
use crate::parser::parse;

fn people() -> CriteriaRegistry {
    let mut r = CriteriaRegistry::new();
    r.add_mapped_criteria_with(
        "First Name",
        "firstname",
        ValueType::String,
        [OperatorTag::Equal, OperatorTag::BeginsWith],
    )
    .unwrap();
    r.add_mapped_criteria_with(
        "Last Name",
        "lastname",
        ValueType::String,
        [OperatorTag::NotEqual, OperatorTag::Contains],
    )
    .unwrap();
    r.add_criteria("zipcode").unwrap();
    r
}

fn last_name(op: OperatorTag) -> Expr {
    Expr::compare("Last Name", op, "smith")
}

// ========================================================================
// Comparisons
// ========================================================================

#[test]
fn test_operator_value_formats() {
    let r = people();
    let cases = [
        (OperatorTag::Equal, r#"lastname = "smith""#),
        (OperatorTag::NotEqual, r#"lastname != "smith""#),
        (OperatorTag::Contains, r#"lastname LIKE "%smith%""#),
        (OperatorTag::BeginsWith, r#"lastname LIKE "smith%""#),
        (OperatorTag::EndsWith, r#"lastname LIKE "%smith""#),
    ];
    for (op, expected) in cases {
        assert_eq!(last_name(op).to_sql(&r).unwrap(), expected);
    }
}

#[test]
fn test_unmapped_criteria_uses_own_name() {
    let expr = Expr::compare("zipcode", OperatorTag::Equal, "02139");
    assert_eq!(expr.to_sql(&people()).unwrap(), r#"zipcode = "02139""#);
}

#[test]
fn test_value_substituted_verbatim() {
    let expr = Expr::compare("zipcode", OperatorTag::Equal, "");
    assert_eq!(expr.to_sql(&people()).unwrap(), r#"zipcode = """#);

    let expr = Expr::compare("zipcode", OperatorTag::Contains, "50%");
    assert_eq!(expr.to_sql(&people()).unwrap(), r#"zipcode LIKE "%50%%""#);
}

#[test]
fn test_unknown_criteria() {
    let err = Expr::compare("Frist Name", OperatorTag::Equal, "Jo")
        .to_sql(&people())
        .unwrap_err();
    assert!(matches!(
        err,
        PredicateError::UnknownCriteria { ref name, suggestion: Some(ref s) }
            if name == "Frist Name" && s == "First Name"
    ));
}

#[test]
fn test_unknown_criteria_never_embedded() {
    let expr = Expr::and([
        Expr::compare("zipcode", OperatorTag::Equal, "02139"),
        Expr::compare("Phone", OperatorTag::Equal, "555"),
    ]);
    assert!(matches!(
        expr.to_sql(&people()),
        Err(PredicateError::UnknownCriteria { suggestion: None, .. })
    ));
}

#[test]
fn test_display_name_is_not_backing_name() {
    let expr = Expr::compare("lastname", OperatorTag::Equal, "smith");
    assert!(expr.to_sql(&people()).is_err());
}

// ========================================================================
// Compounds
// ========================================================================

#[test]
fn test_end_to_end() {
    let expr = Expr::and([
        Expr::compare("First Name", OperatorTag::BeginsWith, "Jo"),
        Expr::compare("Last Name", OperatorTag::Contains, "Smith"),
    ]);
    assert_eq!(
        expr.to_sql(&people()).unwrap(),
        r#"(firstname LIKE "Jo%" AND lastname LIKE "%Smith%")"#
    );
}

#[test]
fn test_or_and_nesting() {
    let expr = Expr::or([
        Expr::and([
            Expr::compare("First Name", OperatorTag::Equal, "Jo"),
            Expr::compare("zipcode", OperatorTag::Equal, "02139"),
        ]),
        last_name(OperatorTag::NotEqual),
        Expr::compare("zipcode", OperatorTag::Equal, "02140"),
    ]);
    assert_eq!(
        expr.to_sql(&people()).unwrap(),
        r#"((firstname = "Jo" AND zipcode = "02139") OR lastname != "smith" OR zipcode = "02140")"#
    );
}

#[test]
fn test_not_is_prefix() {
    let expr = Expr::not(last_name(OperatorTag::Contains));
    assert_eq!(
        expr.to_sql(&people()).unwrap(),
        r#"(NOT lastname LIKE "%smith%")"#
    );

    let expr = Expr::not(Expr::or([
        last_name(OperatorTag::Equal),
        last_name(OperatorTag::EndsWith),
    ]));
    assert_eq!(
        expr.to_sql(&people()).unwrap(),
        r#"(NOT (lastname = "smith" OR lastname LIKE "%smith"))"#
    );
}

#[test]
fn test_single_child_and() {
    let expr = Expr::and([last_name(OperatorTag::Equal)]);
    assert_eq!(expr.to_sql(&people()).unwrap(), r#"(lastname = "smith")"#);
}

#[test]
fn test_malformed_compounds() {
    let r = people();

    let err = Expr::and([]).to_sql(&r).unwrap_err();
    assert!(matches!(
        err,
        PredicateError::MalformedCompound { kind: CompoundKind::And, children: 0 }
    ));

    let two = Expr::compound(
        CompoundKind::Not,
        [last_name(OperatorTag::Equal), last_name(OperatorTag::NotEqual)],
    );
    assert!(matches!(
        two.to_sql(&r),
        Err(PredicateError::MalformedCompound { kind: CompoundKind::Not, children: 2 })
    ));
}

#[test]
fn test_nesting_limit() {
    let r = people();
    let nest = |levels: usize| {
        (0..levels).fold(last_name(OperatorTag::Equal), |inner, _| Expr::not(inner))
    };

    assert!(nest(MAX_DEPTH).to_sql(&r).is_ok());
    assert!(matches!(
        nest(MAX_DEPTH + 1).to_sql(&r),
        Err(PredicateError::NestingTooDeep { limit: MAX_DEPTH })
    ));

    // Deepest shape the parser accepts: three compounds per NOT-and-group.
    let text = format!(
        "{}zipcode = \"1\"{}",
        "NOT (zipcode = \"0\" OR zipcode = \"0\" AND ".repeat(MAX_NESTING / 2),
        ")".repeat(MAX_NESTING / 2)
    );
    let expr = parse(&text).unwrap();
    assert!(expr.to_sql(&r).is_ok());
}

#[test]
fn test_deterministic() {
    let r = people();
    let expr = parse(r#""First Name" BEGINSWITH "Jo" AND NOT ("Last Name" CONTAINS "x")"#).unwrap();
    let first = expr.to_sql(&r).unwrap();
    for _ in 0..10 {
        assert_eq!(expr.to_sql(&r).unwrap(), first);
    }
}

// ========================================================================
// Options
// ========================================================================

#[test]
fn test_strict_operators() {
    let r = people();
    let expr = Expr::compare("First Name", OperatorTag::Contains, "o");

    // Lenient by default.
    assert_eq!(expr.to_sql(&r).unwrap(), r#"firstname LIKE "%o%""#);

    let err = Translator::new(&r)
        .strict_operators(true)
        .translate(&expr)
        .unwrap_err();
    assert!(matches!(
        err,
        PredicateError::UnsupportedOperator { operator: OperatorTag::Contains, .. }
    ));

    let ok = Expr::compare("First Name", OperatorTag::BeginsWith, "J");
    assert!(Translator::new(&r).strict_operators(true).translate(&ok).is_ok());
}

#[test]
fn test_strip_outer_parens() {
    let r = people();
    let t = Translator::new(&r).strip_outer_parens(true);

    let expr = Expr::or([
        Expr::and([
            Expr::compare("zipcode", OperatorTag::Equal, "1"),
            Expr::compare("zipcode", OperatorTag::Equal, "2"),
        ]),
        Expr::and([
            Expr::compare("zipcode", OperatorTag::Equal, "3"),
            Expr::compare("zipcode", OperatorTag::Equal, "4"),
        ]),
    ]);
    assert_eq!(
        t.translate(&expr).unwrap(),
        r#"(zipcode = "1" AND zipcode = "2") OR (zipcode = "3" AND zipcode = "4")"#
    );

    let leaf = Expr::compare("zipcode", OperatorTag::Equal, "1");
    assert_eq!(t.translate(&leaf).unwrap(), r#"zipcode = "1""#);

    let not = Expr::not(leaf);
    assert_eq!(t.translate(&not).unwrap(), r#"NOT zipcode = "1""#);
}

// ========================================================================
// Front-ends
// ========================================================================

#[test]
fn test_text_and_json_agree() {
    let r = people();
    let text = parse(r#"("First Name" = "Jo" OR "First Name" BEGINSWITH "Ja") AND "Last Name" != "Doe""#)
        .unwrap();
    let json = Expr::from_json(
        r#"{"type": "and", "children": [
            {"type": "or", "children": [
                {"type": "comparison", "criteria": "First Name", "operator": "EQUAL", "value": "Jo"},
                {"type": "comparison", "criteria": "First Name", "operator": "BEGINS_WITH", "value": "Ja"}
            ]},
            {"type": "comparison", "criteria": "Last Name", "operator": "!=", "value": "Doe"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(text, json);
    assert_eq!(
        text.to_sql(&r).unwrap(),
        r#"((firstname = "Jo" OR firstname LIKE "Ja%") AND lastname != "Doe")"#
    );
}

#[test]
fn test_shared_registry_across_threads() {
    let r = people();
    let expr = Expr::and([
        Expr::compare("First Name", OperatorTag::BeginsWith, "Jo"),
        Expr::compare("Last Name", OperatorTag::Contains, "Smith"),
    ]);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| Translator::new(&r).translate(&expr.clone())))
            .collect();
        for h in handles {
            assert_eq!(
                h.join().unwrap().unwrap(),
                r#"(firstname LIKE "Jo%" AND lastname LIKE "%Smith%")"#
            );
        }
    });
}
