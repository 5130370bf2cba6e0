use std::borrow::Cow;

use validator::{Validate, ValidationError};

use super::models::{Beer, Manufacturer, NewBeer, NewManufacturer};
use super::store::Page;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::from("must not be blank"));
        return Err(error);
    }
    Ok(())
}

/// Request body for creating or replacing a beer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BeerPayload {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub abv: f64,

    #[serde(default, rename = "type")]
    #[validate(custom(function = "not_blank"))]
    pub beer_type: String,

    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(required(message = "is required"))]
    pub manufacturer_id: Option<i64>,
}

impl BeerPayload {
    /// Columns to store, owned by `manufacturer_id`.
    pub fn to_new_beer(&self, manufacturer_id: i64) -> NewBeer<'_> {
        NewBeer {
            name: &self.name,
            abv: self.abv,
            beer_type: &self.beer_type,
            description: self.description.as_deref(),
            manufacturer_id,
        }
    }
}

/// Request body for creating or replacing a manufacturer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ManufacturerPayload {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub country: String,
}

impl ManufacturerPayload {
    pub fn to_new_manufacturer(&self) -> NewManufacturer<'_> {
        NewManufacturer {
            name: &self.name,
            country: &self.country,
        }
    }
}

/// A beer as it appears in listings.
#[derive(Debug, Clone, Serialize)]
pub struct BeerSummary {
    pub id: i64,
    pub name: String,
}

impl From<Beer> for BeerSummary {
    fn from(beer: Beer) -> BeerSummary {
        BeerSummary {
            id: beer.id,
            name: beer.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDetail {
    pub id: i64,
    pub name: String,
    pub abv: f64,
    #[serde(rename = "type")]
    pub beer_type: String,
    pub description: Option<String>,
    pub manufacturer_id: i64,
}

impl From<Beer> for BeerDetail {
    fn from(beer: Beer) -> BeerDetail {
        BeerDetail {
            id: beer.id,
            name: beer.name,
            abv: beer.abv,
            beer_type: beer.beer_type,
            description: beer.description,
            manufacturer_id: beer.manufacturer_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerDetail {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl From<Manufacturer> for ManufacturerDetail {
    fn from(manufacturer: Manufacturer) -> ManufacturerDetail {
        ManufacturerDetail {
            id: manufacturer.id,
            name: manufacturer.name,
            country: manufacturer.country,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T: serde::Serialize> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T: serde::Serialize> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> PageResponse<T> {
        PageResponse {
            total_pages: page.total_pages(),
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
        }
    }
}
