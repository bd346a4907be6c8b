use pghatch::prelude::*;
use tokio_postgres::NoTls;

async fn connect() -> QbResult<Option<tokio_postgres::Client>> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping live round trip");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(Some(client))
}

#[tokio::test]
async fn crud_roundtrip() -> QbResult<()> {
    let Some(client) = connect().await? else {
        return Ok(());
    };

    client
        .batch_execute(
            "CREATE TEMP TABLE hatch_people (
                id bigserial PRIMARY KEY,
                name text NOT NULL UNIQUE,
                age integer,
                active boolean NOT NULL DEFAULT true
            )",
        )
        .await?;

    let inserted = insert("hatch_people")
        .columns(["name", "age"])
        .values([Value::from("Al"), Value::from(9)])?
        .values([Value::from("Bo"), Value::from(None::<i32>)])?
        .returning(["id"])
        .query(&client)
        .await?;
    assert_eq!(inserted.len(), 2);
    let al_id: i64 = inserted[0].get(0);

    let affected = insert("hatch_people")
        .columns(["name"])
        .values(["Al"])?
        .on_conflict_do_nothing(["name"])
        .execute(&client)
        .await?;
    assert_eq!(affected, 0);

    let rows = select(["name", "age"])
        .from_("hatch_people")
        .where_(col("age").is_not_null())
        .where_(col("name").like("A%"))
        .order_by_asc("name")
        .query(&client)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<_, String>(0), "Al");
    assert_eq!(rows[0].get::<_, Option<i32>>(1), Some(9));

    let updated = update("hatch_people")
        .set("age", 10)
        .where_(col("id").eq(param(al_id)))
        .execute(&client)
        .await?;
    assert_eq!(updated, 1);

    let row = select([func::count_star().as_("n"), func::max("age").as_("oldest")])
        .from_("hatch_people")
        .query_one(&client)
        .await?;
    assert_eq!(row.get::<_, i64>("n"), 2);
    assert_eq!(row.get::<_, Option<i32>>("oldest"), Some(10));

    let none = select(["id"])
        .from_("hatch_people")
        .where_(col("name").eq("nobody"))
        .query_opt(&client)
        .await?;
    assert!(none.is_none());

    let err = select(["id"])
        .from_("hatch_people")
        .where_(col("name").eq("nobody"))
        .query_one(&client)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let deleted = delete("hatch_people")
        .where_(col("active").eq(true))
        .where_(col("id").ne(param(al_id)))
        .execute(&client)
        .await?;
    assert_eq!(deleted, 1);

    Ok(())
}

#[tokio::test]
async fn injection_payload_stays_a_value() -> QbResult<()> {
    let Some(client) = connect().await? else {
        return Ok(());
    };

    client
        .batch_execute("CREATE TEMP TABLE hatch_notes (body text NOT NULL)")
        .await?;

    let payload = "x'); DROP TABLE hatch_notes; --";
    insert("hatch_notes")
        .columns(["body"])
        .values([payload])?
        .execute(&client)
        .await?;

    let row = select(["body"])
        .from_("hatch_notes")
        .where_(col("body").eq(payload))
        .query_one(&client)
        .await?;
    assert_eq!(row.get::<_, String>(0), payload);
    Ok(())
}

#[tokio::test]
async fn builders_run_inside_a_transaction() -> QbResult<()> {
    let Some(mut client) = connect().await? else {
        return Ok(());
    };

    client
        .batch_execute(
            "CREATE TEMP TABLE hatch_counters (name text PRIMARY KEY, n integer NOT NULL)",
        )
        .await?;

    let tx = client.transaction().await?;
    insert("hatch_counters")
        .columns(["name", "n"])
        .values([Value::from("hits"), Value::from(1)])?
        .execute(&tx)
        .await?;
    let bumped = func::greatest([col("hatch_counters.n"), col("excluded.n")]);
    insert("hatch_counters")
        .columns(["name", "n"])
        .values([Value::from("hits"), Value::from(1)])?
        .on_conflict_do_update(["name"], [("n", bumped)])
        .execute(&tx)
        .await?;
    tx.rollback().await?;

    let rows = select_all()
        .from_("hatch_counters")
        .query(&client)
        .await?;
    assert!(rows.is_empty());
    Ok(())
}
