use super::*;
use crate::catalog::Catalog;
use crate::expr::{col, literal, param};
use crate::qb::{SqlQb, select};

fn render_expr(node: impl Into<Node>) -> (String, usize) {
    let built = select([node.into()]).from_("t").build().unwrap();
    let sql = built
        .sql
        .strip_prefix("SELECT ")
        .and_then(|s| s.strip_suffix(" FROM t"))
        .unwrap()
        .to_string();
    (sql, built.params.len())
}

fn sql(node: impl Into<Node>) -> String {
    render_expr(node).0
}

#[test]
fn every_builtin_is_lowercase_and_unique() {
    let mut names: Vec<_> = BUILTINS.iter().map(|b| b.name).collect();
    assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase() || c == '_')));
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn column_positions_take_bare_strings_as_columns() {
    assert_eq!(sql(upper("u.name")), "upper(u.name)");
    assert_eq!(sql(sum("amount")), "sum(amount)");
}

#[test]
fn literal_positions_take_bare_strings_as_text() {
    assert_eq!(sql(to_char("created_at", "YYYY-MM")), "to_char(created_at, 'YYYY-MM')");
    assert_eq!(sql(replace("body", "a'b", "c")), "replace(body, 'a''b', 'c')");
    assert_eq!(sql(date_trunc("month", "created_at")), "date_trunc('month', created_at)");
}

#[test]
fn scalars_are_literals_and_nodes_pass_through() {
    assert_eq!(sql(round("price", Some(2))), "round(price, 2)");
    assert_eq!(sql(substring("name", 1, Some(3))), "substring(name, 1, 3)");
    assert_eq!(sql(coalesce([col("nick"), literal("anon")])), "coalesce(nick, 'anon')");

    let (text, n) = render_expr(nullif("status", param("x")));
    assert_eq!(text, "nullif(status, $1)");
    assert_eq!(n, 1);
}

#[test]
fn count_variants() {
    assert_eq!(sql(count_star()), "count(*)");
    assert_eq!(sql(count("*")), "count(*)");
    assert_eq!(sql(count("id")), "count(id)");
    assert_eq!(sql(count_distinct("id")), "count(DISTINCT id)");
}

#[test]
fn count_where_combines_conditions() {
    let call = count_where([col("a").eq(1), col("b").is_null()]).unwrap();
    assert_eq!(sql(call), "count(*) FILTER (WHERE a = 1 AND b IS NULL)");
    assert!(count_where(Vec::new()).unwrap_err().is_builder());
}

#[test]
fn repeated_filter_and_combines() {
    let call = sum("amount")
        .filter(col("paid").eq(true))
        .filter(col("refunded").eq(false));
    assert_eq!(
        sql(call),
        "sum(amount) FILTER (WHERE paid = TRUE AND refunded = FALSE)"
    );
}

#[test]
fn optional_arguments_are_omitted() {
    assert_eq!(sql(trim("name", None)), "trim(name)");
    assert_eq!(sql(trim("name", Some("x"))), "trim(name, 'x')");
    assert_eq!(sql(lag("price", None)), "lag(price)");
    assert_eq!(sql(lead("price", Some(2))), "lead(price, 2)");
    assert_eq!(sql(to_timestamp("epoch", None)), "to_timestamp(epoch)");
    assert_eq!(sql(age("born_at", None)), "age(born_at)");
}

#[test]
fn json_helpers() {
    assert_eq!(
        sql(jsonb_extract_path_text("payload", ["user", "id"])),
        "jsonb_extract_path_text(payload, 'user', 'id')"
    );
    assert_eq!(
        sql(json_build_object([("id", col("id")), ("n", literal(1))])),
        "json_build_object('id', id, 'n', 1)"
    );
}

#[test]
fn array_helpers() {
    assert_eq!(sql(array_length("tags", 1)), "array_length(tags, 1)");
    assert_eq!(sql(array_append("tags", "new")), "array_append(tags, 'new')");
    assert_eq!(sql(array_prepend("new", "tags")), "array_prepend('new', tags)");
}

#[test]
fn arity_is_checked_on_named_calls() {
    let err = SUM.call(Vec::new()).unwrap_err();
    assert!(err.is_builder());
    assert!(err.to_string().contains("sum() takes 1 arguments, got 0"));

    let err = ROUND.call(vec!["a".into(), 1.into(), 2.into()]).unwrap_err();
    assert!(err.to_string().contains("1 to 2"));

    let err = COALESCE.call(Vec::new()).unwrap_err();
    assert!(err.to_string().contains("at least 1"));
}

fn build_err(node: impl Into<Node>) -> QbError {
    select([node.into()]).from_("t").build().unwrap_err()
}

#[test]
fn empty_variadic_helpers_fail_to_build() {
    let empty = || Vec::<&str>::new();
    for call in [
        coalesce(empty()),
        greatest(empty()),
        least(empty()),
        concat(empty()),
        json_extract_path("doc", empty()),
        jsonb_extract_path("doc", empty()),
        json_extract_path_text("doc", empty()),
        jsonb_extract_path_text("doc", empty()),
    ] {
        let name = call.name.clone();
        let err = build_err(call);
        assert!(err.is_builder(), "{name}: {err}");
        assert!(err.to_string().contains(&format!("{name}() takes at least")));
    }
}

#[test]
fn empty_build_object_is_valid() {
    assert_eq!(sql(json_build_object(Vec::<(&str, &str)>::new())), "json_build_object()");
}

#[test]
fn aggregate_modifiers_on_scalars_are_unsupported() {
    assert!(build_err(upper("name").distinct()).is_unsupported());
    assert!(build_err(upper("name").filter(col("a").eq(1))).is_unsupported());
    assert!(build_err(lower("name").order_by("name")).is_unsupported());
    assert!(build_err(row_number().distinct()).is_unsupported());
    assert!(build_err(coalesce(["a", "b"]).over(Window::new())).is_unsupported());
}

#[test]
fn aggregate_modifiers_on_aggregates_render() {
    assert_eq!(
        sql(jsonb_agg("name").distinct().filter(col("ok").eq(true))),
        "jsonb_agg(DISTINCT name) FILTER (WHERE ok = TRUE)"
    );
    assert_eq!(
        sql(sum("amount").over(Window::new().partition_by(["dept"]))),
        "sum(amount) OVER (PARTITION BY dept)"
    );
}

#[test]
fn user_functions_skip_builtin_checks() {
    let registry = FunctionRegistry::builtin().with_user_functions("api", ["upper"]);
    let call = registry.call("api.upper", Vec::<&str>::new()).unwrap();
    assert_eq!(sql(call), "api.upper()");
}

#[test]
fn coercion_falls_back_to_rest_rule() {
    assert_eq!(CONCAT.coercion(5), Coerce::Literal);
    assert_eq!(SUBSTRING.coercion(0), Coerce::Column);
    assert_eq!(COALESCE.coercion(3), Coerce::Column);
}

// ==================== Registry ====================

#[test]
fn registry_resolves_builtins_case_insensitively() {
    let registry = FunctionRegistry::builtin();
    let call = registry.call("UPPER", ["name"]).unwrap();
    assert_eq!(sql(call), "upper(name)");
    assert!(registry.is_builtin("Count"));
}

#[test]
fn registry_count_without_args_is_star() {
    let registry = FunctionRegistry::builtin();
    let call = registry.call("count", Vec::<Arg>::new()).unwrap();
    assert!(call.agg_star);
}

#[test]
fn registry_rejects_unknown_names() {
    let registry = FunctionRegistry::builtin();
    match registry.call("drop_everything", ["x"]) {
        Err(QbError::UnknownFunction(name)) => assert_eq!(name, "public.drop_everything"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(registry.call("api.search", ["x"]).is_err());
}

#[test]
fn registry_checks_builtin_arity() {
    let registry = FunctionRegistry::builtin();
    assert!(registry.call("now", ["x"]).unwrap_err().is_builder());
}

#[test]
fn user_functions_render_schema_qualified() {
    let registry = FunctionRegistry::builtin()
        .with_user_functions("api", ["search_users"])
        .with_user_functions("public", ["slugify"]);

    let call = registry.call("api.search_users", ["q"]).unwrap();
    assert_eq!(sql(call), "api.search_users(q)");

    let call = registry.call("slugify", ["title"]).unwrap();
    assert_eq!(sql(call), "public.slugify(title)");
}

#[test]
fn dotted_name_never_resolves_to_builtin() {
    let registry = FunctionRegistry::builtin();
    assert!(matches!(
        registry.call("pg_catalog.upper", ["x"]),
        Err(QbError::UnknownFunction(_))
    ));
}

#[test]
fn load_user_functions_from_catalog() {
    let catalog = Catalog::from_json(
        r#"{ "functions": [
            { "schema": "api", "name": "b_fn" },
            { "schema": "api", "name": "a_fn" },
            { "schema": "other", "name": "c_fn" }
        ] }"#,
    )
    .unwrap();

    let mut registry = FunctionRegistry::builtin();
    assert_eq!(registry.load_user_functions(&catalog, "api"), 2);
    assert!(registry.has_user_function("api", "a_fn"));
    assert!(!registry.has_user_function("other", "c_fn"));

    let keys: Vec<_> = registry
        .list_user_functions(Some("api"))
        .into_iter()
        .map(UserFunction::key)
        .collect();
    assert_eq!(keys, vec!["api.a_fn", "api.b_fn"]);
}

#[test]
fn builtins_by_category() {
    let registry = FunctionRegistry::default();
    assert_eq!(
        registry.builtins_in(Category::Window),
        vec![
            "dense_rank",
            "first_value",
            "lag",
            "last_value",
            "lead",
            "nth_value",
            "rank",
            "row_number"
        ]
    );
    assert_eq!(registry.builtins_in(Category::Aggregate).len(), 5);
}
