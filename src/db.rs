use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::error::{Error, Result};
use super::models::{Beer, Manufacturer, NewBeer, NewManufacturer, NewUser, User};
use super::query::{BeerQuery, PageRequest, Predicate, Sort, SortDirection, SortField};
use super::schema::{app_user, beer, manufacturer};
use super::store::{Page, Store};

type Manager = r2d2::ConnectionManager<PgConnection>;

pub type Pool = r2d2::Pool<Manager>;
type PooledConn = r2d2::PooledConnection<Manager>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// SQL `lower()`, used for case-insensitive substring filters.
diesel::define_sql_function!(fn lower(a: diesel::sql_types::VarChar) -> diesel::sql_types::VarChar);

/// Create a connection pool to the database with at most `size` connections.
pub fn create_pool(database_url: &str, size: u32) -> Result<Pool> {
    let manager = Manager::new(database_url);
    Ok(Pool::builder().max_size(size).build(manager)?)
}

/// Apply any migrations that have not yet been run against the database.
pub fn run_migrations(pool: &Pool) -> Result<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;

    for version in applied {
        info!("Applied migration {}", version);
    }
    Ok(())
}

/// Escape `LIKE` wildcards so the needle only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if c == '%' || c == '_' || c == '\\' {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Beer rows satisfying every predicate.
fn filtered_beers(predicates: &[Predicate]) -> beer::BoxedQuery<'static, Pg> {
    let mut query = beer::table.into_boxed();

    for predicate in predicates {
        query = match predicate {
            Predicate::NameContains(needle) => {
                query.filter(lower(beer::name).like(like_pattern(needle)))
            }
            Predicate::TypeContains(needle) => {
                query.filter(lower(beer::beer_type).like(like_pattern(needle)))
            }
            Predicate::AbvEquals(abv) => query.filter(beer::abv.eq(*abv)),
            Predicate::ManufacturerIs(id) => query.filter(beer::manufacturer_id.eq(*id)),
        };
    }

    query
}

fn ordered_beers(
    query: beer::BoxedQuery<'static, Pg>,
    sort: Sort,
) -> beer::BoxedQuery<'static, Pg> {
    use self::SortDirection::{Asc, Desc};

    match (sort.field, sort.direction) {
        (SortField::Name, Asc) => query.order(beer::name.asc()),
        (SortField::Name, Desc) => query.order(beer::name.desc()),
        (SortField::Type, Asc) => query.order(beer::beer_type.asc()),
        (SortField::Type, Desc) => query.order(beer::beer_type.desc()),
        (SortField::Abv, Asc) => query.order(beer::abv.asc()),
        (SortField::Abv, Desc) => query.order(beer::abv.desc()),
        (SortField::Manufacturer, Asc) => query.order(beer::manufacturer_id.asc()),
        (SortField::Manufacturer, Desc) => query.order(beer::manufacturer_id.desc()),
    }
}

/// PostgreSQL-backed catalogue storage.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> PgStore {
        PgStore { pool }
    }

    fn conn(&self) -> Result<PooledConn> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    /*************************************/
    /** Beers                           **/
    /*************************************/

    fn find_beers(&self, query: &BeerQuery) -> Result<Page<Beer>> {
        let mut conn = self.conn()?;

        let total: i64 = filtered_beers(&query.predicates)
            .count()
            .get_result(&mut conn)?;

        let mut select = filtered_beers(&query.predicates);
        if let Some(sort) = query.sort {
            select = ordered_beers(select, sort);
        }

        let beers = select
            .limit(query.page.size)
            .offset(query.page.offset())
            .select(Beer::as_select())
            .load(&mut conn)?;

        Ok(Page::new(beers, query.page, total))
    }

    fn find_beer(&self, id: i64) -> Result<Option<Beer>> {
        let mut conn = self.conn()?;

        Ok(beer::table
            .find(id)
            .select(Beer::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn insert_beer(&self, new_beer: &NewBeer) -> Result<Beer> {
        let mut conn = self.conn()?;

        Ok(diesel::insert_into(beer::table)
            .values(new_beer)
            .returning(Beer::as_returning())
            .get_result(&mut conn)?)
    }

    fn update_beer(&self, id: i64, changes: &NewBeer) -> Result<Option<Beer>> {
        let mut conn = self.conn()?;

        Ok(diesel::update(beer::table.find(id))
            .set((changes, beer::updated_at.eq(Utc::now())))
            .returning(Beer::as_returning())
            .get_result(&mut conn)
            .optional()?)
    }

    fn delete_beer(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(beer::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    /*************************************/
    /** Manufacturers                   **/
    /*************************************/

    fn find_manufacturers(&self, page: PageRequest) -> Result<Page<Manufacturer>> {
        let mut conn = self.conn()?;

        let total: i64 = manufacturer::table.count().get_result(&mut conn)?;
        let manufacturers = manufacturer::table
            .order(manufacturer::id.asc())
            .limit(page.size)
            .offset(page.offset())
            .select(Manufacturer::as_select())
            .load(&mut conn)?;

        Ok(Page::new(manufacturers, page, total))
    }

    fn find_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>> {
        let mut conn = self.conn()?;

        Ok(manufacturer::table
            .find(id)
            .select(Manufacturer::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn insert_manufacturer(&self, new_manufacturer: &NewManufacturer) -> Result<Manufacturer> {
        let mut conn = self.conn()?;

        Ok(diesel::insert_into(manufacturer::table)
            .values(new_manufacturer)
            .returning(Manufacturer::as_returning())
            .get_result(&mut conn)?)
    }

    fn update_manufacturer(
        &self,
        id: i64,
        changes: &NewManufacturer,
    ) -> Result<Option<Manufacturer>> {
        let mut conn = self.conn()?;

        Ok(diesel::update(manufacturer::table.find(id))
            .set((changes, manufacturer::updated_at.eq(Utc::now())))
            .returning(Manufacturer::as_returning())
            .get_result(&mut conn)
            .optional()?)
    }

    fn delete_manufacturer(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(manufacturer::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    /********************************/
    /** Users                      **/
    /********************************/

    fn find_user(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.conn()?;

        Ok(app_user::table
            .filter(app_user::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn insert_user(&self, new_user: &NewUser) -> Result<User> {
        let mut conn = self.conn()?;

        Ok(diesel::insert_into(app_user::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?)
    }
}
