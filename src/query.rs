//! Translation of optional listing parameters into a validated beer query.
//!
//! Nothing here touches the database: the result is a plain description of which
//! predicates to apply, how to order, and which page to fetch. `db` turns it into SQL.

use super::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Raw listing parameters as they arrive on `GET /api/beers`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerListParams {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub beer_type: Option<String>,
    pub abv: Option<f64>,
    pub manufacturer_id: Option<i64>,
    pub sort_by: Option<String>,
    pub dir: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Columns a beer listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Type,
    Abv,
    Manufacturer,
}

impl SortField {
    pub fn parse(value: &str) -> Result<SortField> {
        match value {
            "name" => Ok(SortField::Name),
            "type" => Ok(SortField::Type),
            "abv" => Ok(SortField::Abv),
            "manufacturer" => Ok(SortField::Manufacturer),
            other => Err(Error::InvalidSortField(other.to_owned())),
        }
    }

    /// Name of the underlying `beer` column.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Type => "type",
            SortField::Abv => "abv",
            SortField::Manufacturer => "manufacturer_id",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Result<SortDirection> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(Error::InvalidSortDirection(value.to_owned()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// A single constraint on beer records. A query matches a beer when every predicate does.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match on the name; the needle is stored lower-cased.
    NameContains(String),
    /// Case-insensitive substring match on the type; the needle is stored lower-cased.
    TypeContains(String),
    AbvEquals(f64),
    ManufacturerIs(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Zero-based page index, strictly positive size.
    pub fn new(page: Option<i64>, size: Option<i64>) -> Result<PageRequest> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 0 {
            return Err(Error::Validation(format!(
                "Page index must not be negative: {}",
                page
            )));
        }
        if size < 1 {
            return Err(Error::Validation(format!(
                "Page size must be positive: {}",
                size
            )));
        }

        Ok(PageRequest { page, size })
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeerQuery {
    pub predicates: Vec<Predicate>,
    pub sort: Option<Sort>,
    pub page: PageRequest,
}

impl BeerQuery {
    pub fn build(params: &BeerListParams) -> Result<BeerQuery> {
        let sort = match non_blank(&params.sort_by) {
            Some(sort_by) => {
                let field = SortField::parse(sort_by)?;
                let direction = match non_blank(&params.dir) {
                    Some(dir) => SortDirection::parse(dir)?,
                    None => SortDirection::default(),
                };
                Some(Sort { field, direction })
            }
            None => None,
        };

        let mut predicates = Vec::new();
        if let Some(name) = non_blank(&params.name) {
            predicates.push(Predicate::NameContains(name.to_lowercase()));
        }
        if let Some(beer_type) = non_blank(&params.beer_type) {
            predicates.push(Predicate::TypeContains(beer_type.to_lowercase()));
        }
        if let Some(manufacturer_id) = params.manufacturer_id {
            predicates.push(Predicate::ManufacturerIs(manufacturer_id));
        }
        if let Some(abv) = params.abv {
            predicates.push(Predicate::AbvEquals(abv));
        }

        let page = PageRequest::new(params.page, params.size)?;

        Ok(BeerQuery {
            predicates,
            sort,
            page,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BeerListParams {
        BeerListParams::default()
    }

    #[test]
    fn no_parameters_yields_unordered_first_page() {
        let query = BeerQuery::build(&params()).unwrap();

        assert!(query.predicates.is_empty());
        assert_eq!(query.sort, None);
        assert_eq!(query.page, PageRequest { page: 0, size: 50 });
    }

    #[test]
    fn unknown_sort_field_is_rejected_with_its_value() {
        for value in &["invalidField", "id", "Name", "manufacturer_id", "description"] {
            let params = BeerListParams {
                sort_by: Some(value.to_string()),
                ..params()
            };
            match BeerQuery::build(&params) {
                Err(Error::InvalidSortField(v)) => assert_eq!(&v, value),
                other => panic!("expected InvalidSortField for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn unknown_direction_is_rejected_with_its_value() {
        for value in &["upwards", "ascending", "up", "<"] {
            let params = BeerListParams {
                sort_by: Some("name".into()),
                dir: Some(value.to_string()),
                ..params()
            };
            match BeerQuery::build(&params) {
                Err(Error::InvalidSortDirection(v)) => assert_eq!(&v, value),
                other => panic!("expected InvalidSortDirection for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn invalid_sort_direction_message() {
        let err = SortDirection::parse("upward").unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort direction: upward");

        let err = SortField::parse("unknown").unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort field: unknown");
    }

    #[test]
    fn direction_is_case_insensitive_and_defaults_to_ascending() {
        assert_eq!(SortDirection::parse("DESC").unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::parse("Asc").unwrap(), SortDirection::Asc);

        let query = BeerQuery::build(&BeerListParams {
            sort_by: Some("abv".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(
            query.sort,
            Some(Sort {
                field: SortField::Abv,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn sort_fields_map_to_columns() {
        assert_eq!(SortField::parse("name").unwrap().column(), "name");
        assert_eq!(SortField::parse("type").unwrap().column(), "type");
        assert_eq!(SortField::parse("abv").unwrap().column(), "abv");
        assert_eq!(
            SortField::parse("manufacturer").unwrap().column(),
            "manufacturer_id"
        );
    }

    #[test]
    fn direction_without_sort_field_is_ignored() {
        let query = BeerQuery::build(&BeerListParams {
            dir: Some("sideways".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.sort, None);
    }

    #[test]
    fn supplied_filters_become_predicates() {
        let query = BeerQuery::build(&BeerListParams {
            name: Some("AlP".into()),
            beer_type: Some("IPA".into()),
            abv: Some(5.5),
            manufacturer_id: Some(7),
            ..params()
        })
        .unwrap();

        assert_eq!(
            query.predicates,
            vec![
                Predicate::NameContains("alp".into()),
                Predicate::TypeContains("ipa".into()),
                Predicate::ManufacturerIs(7),
                Predicate::AbvEquals(5.5),
            ]
        );
    }

    #[test]
    fn blank_text_filters_are_omitted() {
        let query = BeerQuery::build(&BeerListParams {
            name: Some("   ".into()),
            beer_type: Some(String::new()),
            ..params()
        })
        .unwrap();
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn page_bounds_are_validated() {
        assert!(matches!(
            PageRequest::new(Some(-1), None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(0)),
            Err(Error::Validation(_))
        ));

        let page = PageRequest::new(Some(3), Some(20)).unwrap();
        assert_eq!(page.offset(), 60);
    }
}
