use super::non_empty;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use minijinja::context;
use sakila::repo::customer::{self, AddressInput, CustomerInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Customer and address fields posted as one flat form.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    pub store_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address: String,
    pub address2: Option<String>,
    pub district: String,
    pub city_id: i32,
    pub postal_code: Option<String>,
    pub phone: String,
}

impl CustomerForm {
    pub fn split(self) -> (CustomerInput, AddressInput) {
        let customer = CustomerInput {
            store_id: self.store_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: non_empty(self.email),
        };
        let address = AddressInput {
            address: self.address,
            address2: non_empty(self.address2),
            district: self.district,
            city_id: self.city_id,
            postal_code: non_empty(self.postal_code),
            phone: self.phone,
        };
        (customer, address)
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(search): Query<CustomerSearch>,
) -> AppResult<Html<String>> {
    let filter = customer::search_filter(
        non_empty(search.first_name.clone()),
        non_empty(search.last_name.clone()),
        non_empty(search.email.clone()),
    );
    let client = state.pool.get().await?;
    let customers = customer::list(&client, &filter).await?;
    state
        .templates
        .render("customers.html", context! { customers => customers, search => search })
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let stores = customer::stores(&client).await?;
    let cities = customer::cities(&client).await?;
    state.templates.render(
        "customer_form.html",
        context! {
            heading => "New customer",
            action => "/customers/create",
            customer => CustomerInput::default(),
            address => AddressInput::default(),
            stores => stores,
            cities => cities,
        },
    )
}

/// Insert the address and the customer together.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> AppResult<Redirect> {
    let (input, address) = form.split();
    customer::validate_pair(&input, &address)?;
    let client = state.pool.get().await?;
    let customer_id = customer::create(&client, &input, &address).await?;
    tracing::info!(customer_id, "customer created");
    Ok(Redirect::to("/customers"))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = customer::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("customer", id))?;
    let stores = customer::stores(&client).await?;
    let cities = customer::cities(&client).await?;
    state.templates.render(
        "customer_form.html",
        context! {
            heading => "Edit customer",
            action => format!("/customers/{id}/update"),
            address => found.address.clone(),
            customer => found,
            stores => stores,
            cities => cities,
        },
    )
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CustomerForm>,
) -> AppResult<Redirect> {
    let (input, address) = form.split();
    customer::validate_pair(&input, &address)?;
    let client = state.pool.get().await?;
    if customer::update(&client, id, &input, &address).await? == 0 {
        return Err(AppError::not_found("customer", id));
    }
    Ok(Redirect::to("/customers"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = customer::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("customer", id))?;
    state.templates.render(
        "confirm_delete.html",
        context! {
            title => "Delete customer",
            label => format!("{} {}", found.first_name, found.last_name),
            action => format!("/customers/{id}/delete"),
            back => "/customers",
        },
    )
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Redirect> {
    let client = state.pool.get().await?;
    customer::delete(&client, id).await?;
    tracing::info!(customer_id = id, "customer deleted");
    Ok(Redirect::to("/customers"))
}
