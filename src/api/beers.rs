use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::authz::Caller;
use crate::catalogue;
use crate::dto::{BeerPayload, PageResponse};
use crate::error::Result;
use crate::query::BeerListParams;
use crate::store::Store;

/// `GET /api/beers`
///
/// Accepts the optional query parameters `name`, `type`, `abv`, `manufacturerId`,
/// `sortBy` (`name`, `type`, `abv` or `manufacturer`), `dir` (`asc` or `desc`),
/// `page` and `size`.
pub async fn list(
    store: web::Data<dyn Store>,
    params: web::Query<BeerListParams>,
) -> Result<HttpResponse> {
    let page = web::block(move || catalogue::list_beers(store.get_ref(), &params)).await??;
    Ok(HttpResponse::Ok().json(PageResponse::from(page)))
}

/// `GET /api/beers/{id}`
pub async fn get(store: web::Data<dyn Store>, id: web::Path<i64>) -> Result<HttpResponse> {
    let id = id.into_inner();
    let beer = web::block(move || catalogue::get_beer(store.get_ref(), id)).await??;
    Ok(HttpResponse::Ok().json(beer))
}

/// `POST /api/beers`, for admins and the owning manufacturer.
pub async fn create(
    store: web::Data<dyn Store>,
    caller: Caller,
    payload: web::Json<BeerPayload>,
) -> Result<HttpResponse> {
    let beer =
        web::block(move || catalogue::create_beer(store.get_ref(), &caller, &payload)).await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/beers/{}", beer.id)))
        .json(beer))
}

/// `PUT /api/beers/{id}`, replacing every field of the beer.
pub async fn update(
    store: web::Data<dyn Store>,
    caller: Caller,
    id: web::Path<i64>,
    payload: web::Json<BeerPayload>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let beer =
        web::block(move || catalogue::update_beer(store.get_ref(), &caller, id, &payload))
            .await??;
    Ok(HttpResponse::Ok().json(beer))
}

/// `DELETE /api/beers/{id}`
pub async fn delete(
    store: web::Data<dyn Store>,
    caller: Caller,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    web::block(move || catalogue::delete_beer(store.get_ref(), &caller, id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
