//! `customer` rows and the `address` row each customer owns.

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::{StoreError, StoreResult};
use crate::filter::{FilterSpec, build_search};
use crate::row::{FromRow, RowExt};
use crate::transaction::TransactionPlan;
use crate::validate::{Validate, ValidationErrors, check_len, check_len_opt};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const NAME_MAX: usize = 45;
pub const EMAIL_MAX: usize = 50;
pub const ADDRESS_MAX: usize = 50;
pub const DISTRICT_MAX: usize = 20;
pub const POSTAL_CODE_MAX: usize = 10;
pub const PHONE_MAX: usize = 20;

const SELECT_CUSTOMERS: &str = "SELECT c.customer_id, c.store_id, c.first_name, c.last_name, \
     c.email, c.address_id, a.address, a.address2, a.district, a.city_id, a.postal_code, a.phone \
     FROM customer c JOIN address a ON a.address_id = c.address_id WHERE 1=1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub customer_id: i32,
    pub store_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address_id: i32,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub address: String,
    pub address2: Option<String>,
    pub district: String,
    pub city_id: i32,
    pub postal_code: Option<String>,
    pub phone: String,
}

impl FromRow for Customer {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            customer_id: row.try_get_column("customer_id")?,
            store_id: row.try_get_column("store_id")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            address_id: row.try_get_column("address_id")?,
            address: Address {
                address: row.try_get_column("address")?,
                address2: row.try_get_column("address2")?,
                district: row.try_get_column("district")?,
                city_id: row.try_get_column("city_id")?,
                postal_code: row.try_get_column("postal_code")?,
                phone: row.try_get_column("phone")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub store_id: i32,
}

impl FromRow for Store {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            store_id: row.try_get_column("store_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    pub city_id: i32,
    pub city: String,
}

impl FromRow for City {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            city_id: row.try_get_column("city_id")?,
            city: row.try_get_column("city")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub store_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub address: String,
    pub address2: Option<String>,
    pub district: String,
    pub city_id: i32,
    pub postal_code: Option<String>,
    pub phone: String,
}

impl Validate for CustomerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "first_name", &self.first_name, NAME_MAX);
        check_len(&mut errors, "last_name", &self.last_name, NAME_MAX);
        check_len_opt(&mut errors, "email", self.email.as_deref(), EMAIL_MAX);
        errors.into_result()
    }
}

impl Validate for AddressInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "address", &self.address, ADDRESS_MAX);
        check_len_opt(&mut errors, "address2", self.address2.as_deref(), ADDRESS_MAX);
        check_len(&mut errors, "district", &self.district, DISTRICT_MAX);
        check_len_opt(&mut errors, "postal_code", self.postal_code.as_deref(), POSTAL_CODE_MAX);
        check_len(&mut errors, "phone", &self.phone, PHONE_MAX);
        errors.into_result()
    }
}

/// Validate both halves of a customer form, reporting every bad field.
pub fn validate_pair(
    customer: &CustomerInput,
    address: &AddressInput,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for result in [customer.validate(), address.validate()] {
        if let Err(e) = result {
            errors.items.extend(e.items);
        }
    }
    errors.into_result()
}

/// Search fields of the customer list, in match order.
pub fn search_filter(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> FilterSpec {
    FilterSpec::new()
        .field("c.first_name", first_name)
        .field("c.last_name", last_name)
        .field("c.email", email)
}

pub fn list_query(filter: &FilterSpec) -> BoundQuery {
    let mut q = build_search(SELECT_CUSTOMERS, filter);
    q.push(" ORDER BY c.customer_id");
    q
}

pub async fn list(db: &impl Executor, filter: &FilterSpec) -> StoreResult<Vec<Customer>> {
    super::fetch_all(db, &list_query(filter)).await
}

pub fn find_query(customer_id: i32) -> BoundQuery {
    let mut q = BoundQuery::new(SELECT_CUSTOMERS);
    q.push(" AND c.customer_id = ").push_bind(customer_id);
    q
}

pub async fn find(db: &impl Executor, customer_id: i32) -> StoreResult<Option<Customer>> {
    super::fetch_opt(db, &find_query(customer_id)).await
}

pub async fn stores(db: &impl Executor) -> StoreResult<Vec<Store>> {
    let q = BoundQuery::new("SELECT store_id FROM store ORDER BY store_id");
    super::fetch_all(db, &q).await
}

pub async fn cities(db: &impl Executor) -> StoreResult<Vec<City>> {
    let q = BoundQuery::new("SELECT city_id, city FROM city ORDER BY city");
    super::fetch_all(db, &q).await
}

fn address_values(address: &AddressInput) -> [Value; 6] {
    [
        Value::from(address.address.as_str()),
        Value::from(address.address2.clone()),
        Value::from(address.district.as_str()),
        Value::Int(address.city_id),
        Value::from(address.postal_code.clone()),
        Value::from(address.phone.as_str()),
    ]
}

/// Insert the address, then the customer pointing at the new address id.
pub fn create_plan(
    customer: &CustomerInput,
    address: &AddressInput,
) -> StoreResult<TransactionPlan> {
    let mut plan = TransactionPlan::new();
    let address_step = plan.insert(BoundQuery::template(
        "INSERT INTO address (address, address2, district, city_id, postal_code, phone) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING address_id",
        address_values(address),
    )?);
    plan.insert(BoundQuery::template(
        "INSERT INTO customer (store_id, first_name, last_name, email, address_id) \
         VALUES (?, ?, ?, ?, ?) RETURNING customer_id",
        [
            Value::Int(customer.store_id),
            Value::from(customer.first_name.as_str()),
            Value::from(customer.last_name.as_str()),
            Value::from(customer.email.clone()),
            Value::key_of(address_step),
        ],
    )?);
    Ok(plan)
}

/// Create a customer together with its address and return the customer id.
///
/// Both rows are written in one transaction; if either insert fails neither
/// row remains.
pub async fn create(
    db: &impl Executor,
    customer: &CustomerInput,
    address: &AddressInput,
) -> StoreResult<i32> {
    validate_pair(customer, address)?;
    let outcome = create_plan(customer, address)?.run(db).await?;
    outcome
        .primary_key()
        .ok_or_else(|| StoreError::Other("customer insert produced no key".to_string()))
}

/// Update the customer row and the address it references.
pub fn update_plan(
    customer_id: i32,
    customer: &CustomerInput,
    address: &AddressInput,
) -> StoreResult<TransactionPlan> {
    let mut plan = TransactionPlan::new();
    plan.execute(BoundQuery::template(
        "UPDATE customer SET store_id = ?, first_name = ?, last_name = ?, email = ?, \
         last_update = now() WHERE customer_id = ?",
        [
            Value::Int(customer.store_id),
            Value::from(customer.first_name.as_str()),
            Value::from(customer.last_name.as_str()),
            Value::from(customer.email.clone()),
            Value::Int(customer_id),
        ],
    )?);

    let [street, street2, district, city, postal_code, phone] = address_values(address);
    plan.execute(BoundQuery::template(
        "UPDATE address SET address = ?, address2 = ?, district = ?, city_id = ?, \
         postal_code = ?, phone = ?, last_update = now() \
         WHERE address_id = (SELECT address_id FROM customer WHERE customer_id = ?)",
        [street, street2, district, city, postal_code, phone, Value::Int(customer_id)],
    )?);
    Ok(plan)
}

pub async fn update(
    db: &impl Executor,
    customer_id: i32,
    customer: &CustomerInput,
    address: &AddressInput,
) -> StoreResult<u64> {
    validate_pair(customer, address)?;
    let outcome = update_plan(customer_id, customer, address)?.run(db).await?;
    Ok(outcome.rows_affected)
}

pub async fn delete(db: &impl Executor, customer_id: i32) -> StoreResult<u64> {
    let q = BoundQuery::template(
        "DELETE FROM customer WHERE customer_id = ?",
        [Value::Int(customer_id)],
    )?;
    db.execute(&q).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInput {
        CustomerInput {
            store_id: 1,
            first_name: "MARY".into(),
            last_name: "SMITH".into(),
            email: Some("mary.smith@sakilacustomer.org".into()),
        }
    }

    fn address() -> AddressInput {
        AddressInput {
            address: "1913 Hanoi Way".into(),
            address2: None,
            district: "Nagasaki".into(),
            city_id: 463,
            postal_code: Some("35200".into()),
            phone: "28303384290".into(),
        }
    }

    #[test]
    fn create_plan_feeds_address_key_into_customer() {
        let plan = create_plan(&customer(), &address()).unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.steps()[0].query.text().starts_with("INSERT INTO address"));
        let customer_insert = &plan.steps()[1].query;
        assert!(customer_insert.text().starts_with("INSERT INTO customer"));
        assert!(matches!(customer_insert.params()[4], Value::Key(step) if step.index() == 0));
        assert!(plan.check().is_ok());
    }

    #[test]
    fn search_uses_qualified_columns() {
        let q = list_query(&search_filter(None, Some("SMI".into()), None));
        assert!(q.text().contains("AND c.last_name LIKE ? ORDER BY"));
        assert_eq!(q.params(), &[Value::from("%SMI%")]);
    }

    #[test]
    fn validate_pair_collects_both_sides() {
        let mut c = customer();
        c.first_name = "N".repeat(NAME_MAX + 1);
        let mut a = address();
        a.phone = "9".repeat(PHONE_MAX + 1);
        let errors = validate_pair(&c, &a).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "phone"]);
    }

    #[test]
    fn update_plan_targets_customer_address() {
        let plan = update_plan(9, &customer(), &address()).unwrap();
        assert_eq!(plan.len(), 2);
        let address_update = &plan.steps()[1].query;
        assert_eq!(address_update.placeholder_count(), 7);
        assert_eq!(address_update.params()[6], Value::Int(9));
    }
}
