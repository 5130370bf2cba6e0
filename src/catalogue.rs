//! Catalogue operations: validation, authorization and persistence for one request.
//!
//! Every function here is synchronous and is expected to run on the blocking pool.

use validator::Validate;

use super::authz::{authorize, require_authenticated, Action, Caller};
use super::dto::{BeerDetail, BeerPayload, BeerSummary, ManufacturerDetail, ManufacturerPayload};
use super::error::{Error, Result};
use super::query::{BeerListParams, BeerQuery, PageRequest};
use super::store::{Page, Store};

/// The manufacturer a validated payload points at.
fn requested_manufacturer(payload: &BeerPayload) -> Result<i64> {
    payload
        .manufacturer_id
        .ok_or_else(|| Error::Validation("manufacturerId: is required".into()))
}

/*************************************/
/** Beers                           **/
/*************************************/

pub fn list_beers(store: &dyn Store, params: &BeerListParams) -> Result<Page<BeerSummary>> {
    let query = BeerQuery::build(params)?;
    debug!("Listing beers matching {:?}", query.predicates);
    if let Some(sort) = query.sort {
        debug!("Ordering beers by {} {:?}", sort.field.column(), sort.direction);
    }

    Ok(store.find_beers(&query)?.map(BeerSummary::from))
}

pub fn get_beer(store: &dyn Store, id: i64) -> Result<BeerDetail> {
    store
        .find_beer(id)?
        .map(BeerDetail::from)
        .ok_or_else(|| Error::beer_not_found(id))
}

pub fn create_beer(store: &dyn Store, caller: &Caller, payload: &BeerPayload) -> Result<BeerDetail> {
    require_authenticated(caller)?;
    payload.validate()?;
    let manufacturer_id = requested_manufacturer(payload)?;

    authorize(caller, Action::CreateBeer { manufacturer_id })?;

    if store.find_manufacturer(manufacturer_id)?.is_none() {
        return Err(Error::manufacturer_not_found(manufacturer_id));
    }

    let beer = store.insert_beer(&payload.to_new_beer(manufacturer_id))?;
    info!("Created beer {} for manufacturer {}", beer.id, manufacturer_id);
    Ok(beer.into())
}

/// Replace every field of an existing beer.
pub fn update_beer(
    store: &dyn Store,
    caller: &Caller,
    id: i64,
    payload: &BeerPayload,
) -> Result<BeerDetail> {
    require_authenticated(caller)?;
    payload.validate()?;
    let requested = requested_manufacturer(payload)?;

    let existing = store.find_beer(id)?.ok_or_else(|| Error::beer_not_found(id))?;
    authorize(
        caller,
        Action::UpdateBeer {
            current: existing.manufacturer_id,
            requested,
        },
    )?;

    if store.find_manufacturer(requested)?.is_none() {
        return Err(Error::manufacturer_not_found(requested));
    }

    let beer = store
        .update_beer(id, &payload.to_new_beer(requested))?
        .ok_or_else(|| Error::beer_not_found(id))?;
    info!("Updated beer {}", id);
    Ok(beer.into())
}

pub fn delete_beer(store: &dyn Store, caller: &Caller, id: i64) -> Result<()> {
    require_authenticated(caller)?;

    let existing = store.find_beer(id)?.ok_or_else(|| Error::beer_not_found(id))?;
    authorize(
        caller,
        Action::DeleteBeer {
            current: existing.manufacturer_id,
        },
    )?;

    if !store.delete_beer(id)? {
        return Err(Error::beer_not_found(id));
    }
    info!("Deleted beer {}", id);
    Ok(())
}

/*************************************/
/** Manufacturers                   **/
/*************************************/

pub fn list_manufacturers(store: &dyn Store, page: PageRequest) -> Result<Page<ManufacturerDetail>> {
    Ok(store.find_manufacturers(page)?.map(ManufacturerDetail::from))
}

pub fn get_manufacturer(store: &dyn Store, id: i64) -> Result<ManufacturerDetail> {
    store
        .find_manufacturer(id)?
        .map(ManufacturerDetail::from)
        .ok_or_else(|| Error::manufacturer_not_found(id))
}

pub fn create_manufacturer(
    store: &dyn Store,
    caller: &Caller,
    payload: &ManufacturerPayload,
) -> Result<ManufacturerDetail> {
    require_authenticated(caller)?;
    payload.validate()?;
    authorize(caller, Action::CreateManufacturer)?;

    let manufacturer = store.insert_manufacturer(&payload.to_new_manufacturer())?;
    info!("Created manufacturer {}", manufacturer.id);
    Ok(manufacturer.into())
}

pub fn update_manufacturer(
    store: &dyn Store,
    caller: &Caller,
    id: i64,
    payload: &ManufacturerPayload,
) -> Result<ManufacturerDetail> {
    require_authenticated(caller)?;
    payload.validate()?;
    authorize(caller, Action::UpdateManufacturer { id })?;

    let manufacturer = store
        .update_manufacturer(id, &payload.to_new_manufacturer())?
        .ok_or_else(|| Error::manufacturer_not_found(id))?;
    info!("Updated manufacturer {}", id);
    Ok(manufacturer.into())
}

pub fn delete_manufacturer(store: &dyn Store, caller: &Caller, id: i64) -> Result<()> {
    authorize(caller, Action::DeleteManufacturer { id })?;

    if !store.delete_manufacturer(id)? {
        return Err(Error::manufacturer_not_found(id));
    }
    info!("Deleted manufacturer {}", id);
    Ok(())
}
