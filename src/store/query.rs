use sea_orm::Order;

use crate::entities::film;

use super::StoreError;

/// Film columns clients may sort and filter on. Query input is mapped
/// onto this enum before it gets anywhere near a statement, so column
/// names never come from the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmField {
    Id,
    Name,
    Description,
    Date,
    Rate,
}

impl FilmField {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "date" => Some(Self::Date),
            "rate" => Some(Self::Rate),
            _ => None,
        }
    }

    pub fn to_column(self) -> film::Column {
        match self {
            Self::Id => film::Column::Id,
            Self::Name => film::Column::Name,
            Self::Description => film::Column::Description,
            Self::Date => film::Column::Date,
            Self::Rate => film::Column::Rate,
        }
    }
}

/// A validated `sortBy` expression: a field name with an optional
/// `asc`/`desc` suffix, e.g. `name` or `date desc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: FilmField,
    pub order: Order,
}

impl SortSpec {
    /// Parse a client-supplied sort expression. An empty expression and
    /// plain `rate` both mean rate, highest first, which is the listing
    /// order callers get by default.
    pub fn parse(input: Option<&str>) -> Result<Self, StoreError> {
        let input = input.map(str::trim).unwrap_or("");
        if input.is_empty() || input.eq_ignore_ascii_case("rate") {
            return Ok(SortSpec {
                field: FilmField::Rate,
                order: Order::Desc,
            });
        }

        let mut parts = input.split_whitespace();
        let field = parts.next().unwrap_or("");
        let field = FilmField::parse(&field.to_ascii_lowercase())
            .ok_or_else(|| StoreError::InvalidQuery(format!("unknown sort field: {field}")))?;

        let order = match parts.next() {
            None => Order::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Order::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Order::Desc,
            Some(dir) => {
                return Err(StoreError::InvalidQuery(format!(
                    "unknown sort direction: {dir}"
                )));
            }
        };

        if parts.next().is_some() {
            return Err(StoreError::InvalidQuery(format!(
                "malformed sort expression: {input}"
            )));
        }

        Ok(SortSpec { field, order })
    }
}

/// A validated `filter` expression in `field.value` form. Matching is
/// substring style (`LIKE '%value%'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub field: FilmField,
    pub value: String,
}

impl FilterSpec {
    /// Parse a `field.value` filter expression. Only the first dot
    /// separates field from value, so values may contain dots.
    pub fn parse(input: Option<&str>) -> Result<Option<Self>, StoreError> {
        let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let (field, value) = input.split_once('.').ok_or_else(|| {
            StoreError::InvalidQuery(format!("malformed filter, expected field.value: {input}"))
        })?;
        let field = FilmField::parse(&field.to_ascii_lowercase())
            .ok_or_else(|| StoreError::InvalidQuery(format!("unknown filter field: {field}")))?;

        Ok(Some(FilterSpec {
            field,
            value: value.to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_rate_desc() {
        let spec = SortSpec::parse(None).unwrap();
        assert_eq!(spec.field, FilmField::Rate);
        assert_eq!(spec.order, Order::Desc);

        let spec = SortSpec::parse(Some("")).unwrap();
        assert_eq!(spec.field, FilmField::Rate);
        assert_eq!(spec.order, Order::Desc);
    }

    #[test]
    fn plain_rate_sorts_descending() {
        let spec = SortSpec::parse(Some("rate")).unwrap();
        assert_eq!(spec.field, FilmField::Rate);
        assert_eq!(spec.order, Order::Desc);
    }

    #[test]
    fn other_fields_sort_ascending_by_default() {
        let spec = SortSpec::parse(Some("name")).unwrap();
        assert_eq!(spec.field, FilmField::Name);
        assert_eq!(spec.order, Order::Asc);
    }

    #[test]
    fn explicit_direction_is_honored() {
        let spec = SortSpec::parse(Some("date DESC")).unwrap();
        assert_eq!(spec.field, FilmField::Date);
        assert_eq!(spec.order, Order::Desc);

        let spec = SortSpec::parse(Some("Rate asc")).unwrap();
        assert_eq!(spec.field, FilmField::Rate);
        assert_eq!(spec.order, Order::Asc);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = SortSpec::parse(Some("actors")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));

        let err = SortSpec::parse(Some("rate; DROP TABLE films")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn unknown_sort_direction_is_rejected() {
        let err = SortSpec::parse(Some("name sideways")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn filter_splits_on_first_dot() {
        let spec = FilterSpec::parse(Some("name.Dr. Strangelove"))
            .unwrap()
            .unwrap();
        assert_eq!(spec.field, FilmField::Name);
        assert_eq!(spec.value, "Dr. Strangelove");
    }

    #[test]
    fn empty_filter_means_no_filter() {
        assert_eq!(FilterSpec::parse(None).unwrap(), None);
        assert_eq!(FilterSpec::parse(Some("")).unwrap(), None);
    }

    #[test]
    fn filter_without_dot_is_rejected() {
        let err = FilterSpec::parse(Some("name")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        let err = FilterSpec::parse(Some("password.x")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }
}
