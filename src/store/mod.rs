//! The persistence seam between request handling and the database.

#[cfg(test)]
pub mod memory;

use super::error::Result;
use super::models::{Beer, Manufacturer, NewBeer, NewManufacturer, NewUser, User};
use super::query::{BeerQuery, PageRequest};

/// One page of results plus the total number of matching records.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Page<T> {
        Page {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        self.total_elements / self.size + (self.total_elements % self.size != 0) as i64
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

/// Synchronous catalogue storage. Each call is a single atomic operation.
///
/// Implementations are shared across worker threads and called from the blocking pool.
pub trait Store: Send + Sync {
    fn find_beers(&self, query: &BeerQuery) -> Result<Page<Beer>>;

    fn find_beer(&self, id: i64) -> Result<Option<Beer>>;

    fn insert_beer(&self, beer: &NewBeer) -> Result<Beer>;

    /// Replace every editable column. `None` when no beer has the id.
    fn update_beer(&self, id: i64, beer: &NewBeer) -> Result<Option<Beer>>;

    /// `false` when no beer has the id.
    fn delete_beer(&self, id: i64) -> Result<bool>;

    fn find_manufacturers(&self, page: PageRequest) -> Result<Page<Manufacturer>>;

    fn find_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>>;

    fn insert_manufacturer(&self, manufacturer: &NewManufacturer) -> Result<Manufacturer>;

    fn update_manufacturer(
        &self,
        id: i64,
        manufacturer: &NewManufacturer,
    ) -> Result<Option<Manufacturer>>;

    fn delete_manufacturer(&self, id: i64) -> Result<bool>;

    fn find_user(&self, username: &str) -> Result<Option<User>>;

    fn insert_user(&self, user: &NewUser) -> Result<User>;
}
