use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::authz::Caller;
use crate::catalogue;
use crate::dto::{ManufacturerPayload, PageResponse};
use crate::error::Result;
use crate::query::PageRequest;
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<i64>,
    size: Option<i64>,
}

/// `GET /api/manufacturers?page=&size=`
pub async fn list(
    store: web::Data<dyn Store>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let request = PageRequest::new(params.page, params.size)?;
    let page =
        web::block(move || catalogue::list_manufacturers(store.get_ref(), request)).await??;
    Ok(HttpResponse::Ok().json(PageResponse::from(page)))
}

/// `GET /api/manufacturers/{id}`
pub async fn get(store: web::Data<dyn Store>, id: web::Path<i64>) -> Result<HttpResponse> {
    let id = id.into_inner();
    let manufacturer = web::block(move || catalogue::get_manufacturer(store.get_ref(), id)).await??;
    Ok(HttpResponse::Ok().json(manufacturer))
}

/// `POST /api/manufacturers`, admins only.
pub async fn create(
    store: web::Data<dyn Store>,
    caller: Caller,
    payload: web::Json<ManufacturerPayload>,
) -> Result<HttpResponse> {
    let manufacturer =
        web::block(move || catalogue::create_manufacturer(store.get_ref(), &caller, &payload))
            .await??;

    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/manufacturers/{}", manufacturer.id),
        ))
        .json(manufacturer))
}

/// `PUT /api/manufacturers/{id}`, for admins and the manufacturer's own account.
pub async fn update(
    store: web::Data<dyn Store>,
    caller: Caller,
    id: web::Path<i64>,
    payload: web::Json<ManufacturerPayload>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let manufacturer = web::block(move || {
        catalogue::update_manufacturer(store.get_ref(), &caller, id, &payload)
    })
    .await??;
    Ok(HttpResponse::Ok().json(manufacturer))
}

/// `DELETE /api/manufacturers/{id}`
pub async fn delete(
    store: web::Data<dyn Store>,
    caller: Caller,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    web::block(move || catalogue::delete_manufacturer(store.get_ref(), &caller, id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
