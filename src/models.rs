use super::authz::Role;
use super::schema::*;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Stored value of `app_user.role` for administrators.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Stored value of `app_user.role` for accounts scoped to one manufacturer.
pub const ROLE_MANUFACTURER: &str = "MANUFACTURER";

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = manufacturer)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = manufacturer)]
pub struct NewManufacturer<'a> {
    pub name: &'a str,
    pub country: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = beer)]
pub struct Beer {
    pub id: i64,
    pub name: String,
    pub abv: f64,
    pub beer_type: String,
    pub description: Option<String>,
    pub manufacturer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for inserting a beer, or replacing every editable column of an existing one.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = beer, treat_none_as_null = true)]
pub struct NewBeer<'a> {
    pub name: &'a str,
    pub abv: f64,
    pub beer_type: &'a str,
    pub description: Option<&'a str>,
    pub manufacturer_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = app_user)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub manufacturer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Resolve the stored role column into a typed role.
    ///
    /// A manufacturer account without a manufacturer association has no usable role.
    pub fn role(&self) -> Option<Role> {
        match (self.role.as_deref(), self.manufacturer_id) {
            (Some(ROLE_ADMIN), _) => Some(Role::Admin),
            (Some(ROLE_MANUFACTURER), Some(owner)) => Some(Role::Manufacturer(owner)),
            _ => None,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = app_user)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: Option<&'a str>,
    pub manufacturer_id: Option<i64>,
}
