//! Behaviour every builder must keep, checked through the public API only.

use pghatch::prelude::*;
use pghatch::render::ParamList;

fn params(list: &ParamList) -> Vec<Value> {
    list.values().to_vec()
}

#[test]
fn build_is_idempotent() {
    let q = select(["id", "name"])
        .from_("users")
        .left_join("teams", col("teams.id").eq(col("users.team_id")))
        .where_(col("users.email").ilike("%@example.com"))
        .where_(col("teams.name").in_(["core", "infra"]).unwrap())
        .order_by_desc("users.id")
        .limit(10);

    let a = q.build().unwrap();
    let b = q.build().unwrap();
    assert_eq!(a.sql, b.sql);
    assert_eq!(params(&a.params), params(&b.params));
}

#[test]
fn param_values_never_reach_sql_text() {
    let hostile = [
        "'; DROP TABLE users; --",
        "$$ OR TRUE $$",
        "\" OR 1=1 --",
        "Robert'); DELETE FROM students;--",
    ];
    for (i, payload) in hostile.iter().enumerate() {
        let built = select(["id"])
            .from_("users")
            .where_(col("name").eq(param(*payload)))
            .where_(col("nick").eq(*payload))
            .build()
            .unwrap();
        assert!(!built.sql.contains(payload), "case {i}: {}", built.sql);
        assert_eq!(built.sql, "SELECT id FROM users WHERE name = $1 AND nick = $2");
        assert_eq!(built.params.get(1), Some(&Value::from(*payload)));
        assert_eq!(built.params.get(2), Some(&Value::from(*payload)));
    }
}

#[test]
fn and_fold_is_left_associative_in_operand_order() {
    let cond = and_([col("a").eq(1), col("b").eq(2), col("c").eq(3)]).unwrap();
    let expected = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
    assert_eq!(cond, expected);

    let built = select(["id"]).from_("t").where_(cond).build().unwrap();
    assert_eq!(built.sql, "SELECT id FROM t WHERE a = 1 AND b = 2 AND c = 3");
}

#[test]
fn single_operand_fold_returns_it_unchanged() {
    let only = col("a").is_null();
    assert_eq!(and_([only.clone()]).unwrap(), only);
    assert_eq!(or_([only.clone()]).unwrap(), only);
}

#[test]
fn empty_folds_are_builder_errors() {
    assert!(and_([]).unwrap_err().is_builder());
    assert!(or_([]).unwrap_err().is_builder());
}

#[test]
fn where_accumulation_equals_explicit_and() {
    let a = col("a").eq(param("x"));
    let b = col("b").lt(param(5));
    let chained = select(["id"]).from_("t").where_(a.clone()).where_(b.clone());
    let folded = select(["id"]).from_("t").where_(and_([a, b]).unwrap());

    let (c, f) = (chained.build().unwrap(), folded.build().unwrap());
    assert_eq!(c.sql, f.sql);
    assert_eq!(params(&c.params), params(&f.params));
}

#[test]
fn join_order_is_call_order() {
    let sql = select(["t.id"])
        .from_("t")
        .left_join("u", col("u.id").eq(col("t.u_id")))
        .inner_join("v", col("v.id").eq(col("u.v_id")))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT t.id FROM t LEFT JOIN u ON u.id = t.u_id INNER JOIN v ON v.id = u.v_id"
    );
}

#[test]
fn cte_params_come_first() {
    let cte = select(["id"])
        .from_("events")
        .where_(col("kind").eq(param("p1")));
    let built = select(["id"])
        .from_("recent")
        .where_(col("id").gt(param("p2")))
        .with_("recent", cte)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(params(&built.params), vec![Value::from("p1"), Value::from("p2")]);
    assert!(built.sql.starts_with("WITH recent AS (SELECT id FROM events WHERE kind = $1) "));
}

#[test]
fn multiple_ctes_render_in_registration_order() {
    let built = select_all()
        .from_("b")
        .with_("a", select(["x"]).from_("t").where_(col("x").eq(param(1))))
        .unwrap()
        .with_("b", select(["x"]).from_("a").where_(col("x").eq(param(2))))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "WITH a AS (SELECT x FROM t WHERE x = $1), b AS (SELECT x FROM a WHERE x = $2) SELECT * FROM b"
    );
    assert_eq!(params(&built.params), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn placeholders_are_dense_and_one_based() {
    let built = insert("t")
        .columns(["a", "b", "c"])
        .values([1, 2, 3])
        .unwrap()
        .values([4, 5, 6])
        .unwrap()
        .build()
        .unwrap();
    for n in 1..=6 {
        assert!(built.sql.contains(&format!("${n}")));
    }
    assert!(!built.sql.contains("$0"));
    assert!(!built.sql.contains("$7"));
    assert_eq!(built.params.len(), 6);
}

#[test]
fn simple_select_has_no_params() {
    let built = select(["id", "name"])
        .from_("users")
        .where_(col("active").eq(true))
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT id, name FROM users WHERE active = TRUE");
    assert!(built.params.is_empty());
}

#[test]
fn in_list_of_params() {
    let built = select(["*"])
        .from_("users")
        .where_(col("id").in_([param(1), param(2)]).unwrap())
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE id IN ($1, $2)");
    assert_eq!(params(&built.params), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn empty_in_list_is_a_builder_error() {
    assert!(col("id").in_(Vec::<i64>::new()).unwrap_err().is_builder());
}

#[test]
fn insert_binds_every_value() {
    let built = insert("t")
        .columns(["name", "age"])
        .values([Value::from("Al"), Value::from(9)])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.sql, "INSERT INTO t (name, age) VALUES ($1, $2)");
    assert_eq!(params(&built.params), vec![Value::from("Al"), Value::Int(9)]);
}

#[test]
fn zero_arm_case_is_a_builder_error() {
    assert!(case().else_(1).end().unwrap_err().is_builder());
}

#[test]
fn unknown_function_is_rejected() {
    let registry = FunctionRegistry::builtin();
    assert!(matches!(
        registry.call("definitely_not_a_function", ["x"]),
        Err(QbError::UnknownFunction(_))
    ));
}

#[test]
fn render_config_from_json() {
    let config = RenderConfig::from_json(r#"{ "quote_identifiers": "always" }"#).unwrap();
    let sql = select(["id"]).from_("t").build_with(&config).unwrap().sql;
    assert_eq!(sql, r#"SELECT "id" FROM "t""#);
}
