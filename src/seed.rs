//! Initial catalogue contents for a fresh database.

use super::auth::hash_password;
use super::error::Result;
use super::models::{NewBeer, NewManufacturer, NewUser, ROLE_ADMIN, ROLE_MANUFACTURER};
use super::query::PageRequest;
use super::store::Store;

/// Populate an empty catalogue with two manufacturers and their beers, then make
/// sure the default accounts exist.
///
/// Manufacturers and beers are only inserted when there are no manufacturers yet, so
/// restarting the service does not duplicate them.
pub fn seed(store: &dyn Store) -> Result<()> {
    let existing = store.find_manufacturers(PageRequest { page: 0, size: 1 })?;
    if existing.total_elements > 0 {
        info!("Catalogue already populated; skipping seed data");
        return Ok(());
    }

    let brew_co = store.insert_manufacturer(&NewManufacturer {
        name: "Brew Co",
        country: "US",
    })?;
    let craft_works = store.insert_manufacturer(&NewManufacturer {
        name: "Craft Works",
        country: "UK",
    })?;

    let beers = [
        ("IPA", 5.5, "India Pale Ale", brew_co.id),
        ("Stout", 6.0, "Dark Ale", craft_works.id),
        ("Pilsner", 4.5, "Light Lager", brew_co.id),
        ("Porter", 5.8, "Dark Ale", craft_works.id),
    ];
    for &(name, abv, beer_type, manufacturer_id) in beers.iter() {
        store.insert_beer(&NewBeer {
            name,
            abv,
            beer_type,
            description: Some(""),
            manufacturer_id,
        })?;
    }

    let users = [
        ("brewery1", "brewpass", ROLE_MANUFACTURER, Some(brew_co.id)),
        ("brewery2", "brewpass2", ROLE_MANUFACTURER, Some(craft_works.id)),
        ("admin", "adminpass", ROLE_ADMIN, None),
    ];
    for &(username, password, role, manufacturer_id) in users.iter() {
        if store.find_user(username)?.is_some() {
            continue;
        }

        let password_hash = hash_password(password)?;
        store.insert_user(&NewUser {
            username,
            password_hash: &password_hash,
            role: Some(role),
            manufacturer_id,
        })?;
        info!("Created user {}", username);
    }

    info!("Seeded catalogue with {} beers", beers.len());
    Ok(())
}
