//! In-process `Store` used by the test suite.

use std::cmp::Ordering;
use std::sync::RwLock;

use chrono::Utc;

use super::{Page, Store};
use crate::error::{Error, Result};
use crate::models::{Beer, Manufacturer, NewBeer, NewManufacturer, NewUser, User};
use crate::query::{BeerQuery, PageRequest, Predicate, SortDirection, SortField};

#[derive(Default)]
struct Tables {
    next_id: i64,
    beers: Vec<Beer>,
    manufacturers: Vec<Manufacturer>,
    users: Vec<User>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_manufacturer(&self, id: i64) -> bool {
        self.manufacturers.iter().any(|m| m.id == id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn matches(beer: &Beer, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::NameContains(needle) => beer.name.to_lowercase().contains(needle.as_str()),
        Predicate::TypeContains(needle) => beer.beer_type.to_lowercase().contains(needle.as_str()),
        Predicate::AbvEquals(abv) => beer.abv == *abv,
        Predicate::ManufacturerIs(id) => beer.manufacturer_id == *id,
    }
}

fn compare(a: &Beer, b: &Beer, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Type => a.beer_type.cmp(&b.beer_type),
        SortField::Abv => a.abv.partial_cmp(&b.abv).unwrap_or(Ordering::Equal),
        SortField::Manufacturer => a.manufacturer_id.cmp(&b.manufacturer_id),
    }
}

fn paginate<T: Clone>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let content = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.size as usize)
        .collect();
    Page::new(content, request, total)
}

impl Store for MemoryStore {
    fn find_beers(&self, query: &BeerQuery) -> Result<Page<Beer>> {
        let tables = self.read();
        let mut beers: Vec<Beer> = tables
            .beers
            .iter()
            .filter(|beer| query.predicates.iter().all(|p| matches(beer, p)))
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            beers.sort_by(|a, b| {
                let ordering = compare(a, b, sort.field);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        Ok(paginate(beers, query.page))
    }

    fn find_beer(&self, id: i64) -> Result<Option<Beer>> {
        Ok(self.read().beers.iter().find(|b| b.id == id).cloned())
    }

    fn insert_beer(&self, beer: &NewBeer) -> Result<Beer> {
        let mut tables = self.write();
        if !tables.has_manufacturer(beer.manufacturer_id) {
            return Err(Error::Conflict("Unknown manufacturer".into()));
        }

        let now = Utc::now();
        let stored = Beer {
            id: tables.next_id(),
            name: beer.name.to_owned(),
            abv: beer.abv,
            beer_type: beer.beer_type.to_owned(),
            description: beer.description.map(str::to_owned),
            manufacturer_id: beer.manufacturer_id,
            created_at: now,
            updated_at: now,
        };
        tables.beers.push(stored.clone());
        Ok(stored)
    }

    fn update_beer(&self, id: i64, beer: &NewBeer) -> Result<Option<Beer>> {
        let mut tables = self.write();
        if !tables.has_manufacturer(beer.manufacturer_id) {
            return Err(Error::Conflict("Unknown manufacturer".into()));
        }

        Ok(tables.beers.iter_mut().find(|b| b.id == id).map(|stored| {
            stored.name = beer.name.to_owned();
            stored.abv = beer.abv;
            stored.beer_type = beer.beer_type.to_owned();
            stored.description = beer.description.map(str::to_owned);
            stored.manufacturer_id = beer.manufacturer_id;
            stored.updated_at = Utc::now();
            stored.clone()
        }))
    }

    fn delete_beer(&self, id: i64) -> Result<bool> {
        let mut tables = self.write();
        let before = tables.beers.len();
        tables.beers.retain(|b| b.id != id);
        Ok(tables.beers.len() != before)
    }

    fn find_manufacturers(&self, page: PageRequest) -> Result<Page<Manufacturer>> {
        Ok(paginate(self.read().manufacturers.clone(), page))
    }

    fn find_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>> {
        Ok(self.read().manufacturers.iter().find(|m| m.id == id).cloned())
    }

    fn insert_manufacturer(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer> {
        let mut tables = self.write();
        let now = Utc::now();
        let stored = Manufacturer {
            id: tables.next_id(),
            name: manufacturer.name.to_owned(),
            country: manufacturer.country.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.manufacturers.push(stored.clone());
        Ok(stored)
    }

    fn update_manufacturer(
        &self,
        id: i64,
        manufacturer: &NewManufacturer,
    ) -> Result<Option<Manufacturer>> {
        let mut tables = self.write();
        Ok(tables
            .manufacturers
            .iter_mut()
            .find(|m| m.id == id)
            .map(|stored| {
                stored.name = manufacturer.name.to_owned();
                stored.country = manufacturer.country.to_owned();
                stored.updated_at = Utc::now();
                stored.clone()
            }))
    }

    fn delete_manufacturer(&self, id: i64) -> Result<bool> {
        let mut tables = self.write();
        if tables.beers.iter().any(|b| b.manufacturer_id == id) {
            return Err(Error::Conflict(
                "The record is still referenced elsewhere".into(),
            ));
        }

        let before = tables.manufacturers.len();
        tables.manufacturers.retain(|m| m.id != id);
        if tables.manufacturers.len() == before {
            return Ok(false);
        }

        // Accounts of a deleted manufacturer lose their association, as `ON DELETE SET NULL` does.
        for user in tables.users.iter_mut().filter(|u| u.manufacturer_id == Some(id)) {
            user.manufacturer_id = None;
            user.updated_at = Utc::now();
        }
        Ok(true)
    }

    fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn insert_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.write();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(Error::Conflict("Username already exists".into()));
        }

        let now = Utc::now();
        let stored = User {
            id: tables.next_id(),
            username: user.username.to_owned(),
            password_hash: user.password_hash.to_owned(),
            role: user.role.map(str::to_owned),
            manufacturer_id: user.manufacturer_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }
}
