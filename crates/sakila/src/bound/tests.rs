use super::*;

#[test]
fn builds_placeholders_in_order() {
    let mut q = BoundQuery::new("SELECT * FROM actor WHERE actor_id = ");
    q.push_bind(1).push(" AND last_name = ").push_bind("GUINESS");

    assert_eq!(
        q.to_sql(),
        "SELECT * FROM actor WHERE actor_id = $1 AND last_name = $2"
    );
    assert_eq!(
        q.text(),
        "SELECT * FROM actor WHERE actor_id = ? AND last_name = ?"
    );
    assert_eq!(q.params(), &[Value::Int(1), Value::from("GUINESS")]);
}

#[test]
fn template_counts_placeholders() {
    let q = BoundQuery::template(
        "INSERT INTO category (name) VALUES (?)",
        [Value::from("Noir")],
    )
    .unwrap();
    assert_eq!(q.to_sql(), "INSERT INTO category (name) VALUES ($1)");
    assert_eq!(q.placeholder_count(), 1);
    assert_eq!(q.params().len(), 1);
}

#[test]
fn template_rejects_mismatch() {
    let err = BoundQuery::template("UPDATE actor SET first_name = ? WHERE actor_id = ?", [
        Value::from("PENELOPE"),
    ])
    .unwrap_err();
    assert!(matches!(err, StoreError::Statement(_)));
}

#[test]
fn template_with_trailing_placeholder() {
    let q = BoundQuery::template("DELETE FROM actor WHERE actor_id = ?", [Value::Int(3)]).unwrap();
    assert_eq!(q.text(), "DELETE FROM actor WHERE actor_id = ?");
    assert_eq!(q.to_sql(), "DELETE FROM actor WHERE actor_id = $1");
}

#[test]
fn bind_list_renders_commas() {
    let mut q = BoundQuery::new("SELECT * FROM actor WHERE actor_id IN (");
    q.push_bind_list(vec![1, 2, 3]).push(")");
    assert_eq!(
        q.to_sql(),
        "SELECT * FROM actor WHERE actor_id IN ($1, $2, $3)"
    );
    assert_eq!(q.params_ref().len(), 3);
}

#[test]
fn bind_list_empty_is_valid_sql() {
    let mut q = BoundQuery::new("SELECT * FROM actor WHERE actor_id IN (");
    q.push_bind_list(Vec::<i32>::new()).push(")");
    assert_eq!(q.to_sql(), "SELECT * FROM actor WHERE actor_id IN (NULL)");
    assert!(q.params().is_empty());
}

#[test]
fn resolves_generated_keys() {
    let q = BoundQuery::template(
        "INSERT INTO customer (first_name, address_id) VALUES (?, ?)",
        [Value::from("MARY"), Value::key_of(StepId(0))],
    )
    .unwrap();
    assert!(q.has_keys());

    let resolved = q.resolve_keys(&[Some(42)]).unwrap();
    assert!(!resolved.has_keys());
    assert_eq!(resolved.params()[1], Value::Int(42));
    assert_eq!(resolved.text(), q.text());
}

#[test]
fn resolving_missing_key_fails() {
    let q = BoundQuery::template("INSERT INTO film_actor (film_id) VALUES (?)", [Value::key_of(
        StepId(1),
    )])
    .unwrap();
    assert!(q.resolve_keys(&[Some(1), None]).is_err());
    assert!(q.resolve_keys(&[Some(1)]).is_err());
}

#[test]
fn question_mark_in_value_stays_out_of_text() {
    let mut q = BoundQuery::new("SELECT film_id FROM film WHERE 1=1");
    q.push(" AND title = ").push_bind("WHY?");
    assert_eq!(q.text(), "SELECT film_id FROM film WHERE 1=1 AND title = ?");
    assert_eq!(q.text().matches('?').count(), q.params().len());
    assert_eq!(q.to_sql(), "SELECT film_id FROM film WHERE 1=1 AND title = $1");
}
