use url::form_urlencoded;

use crate::model::filter::{FilterConfig, SortBy};
use crate::model::item::{ALL_CATEGORIES, Condition};

/// A free-text query together with its filters, as carried in a shareable URL
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    pub query: String,
    pub filters: FilterConfig,
}

/// Encode a search as a query string. Keys holding their default value are omitted.
pub fn to_query_string(req: &SearchRequest) -> String {
    let f = &req.filters;
    let mut ser = form_urlencoded::Serializer::new(String::new());
    if !req.query.is_empty() {
        ser.append_pair("q", &req.query);
    }
    if !f.category.is_empty() && f.category != ALL_CATEGORIES {
        ser.append_pair("category", &f.category);
    }
    if let Some(c) = f.condition {
        ser.append_pair("condition", c.as_str());
    }
    if let Some(min) = f.min_bound() {
        ser.append_pair("minPrice", &min.to_string());
    }
    if let Some(max) = f.max_bound() {
        ser.append_pair("maxPrice", &max.to_string());
    }
    if !f.location.is_empty() {
        ser.append_pair("location", &f.location);
    }
    if f.sort_by != SortBy::Newest {
        ser.append_pair("sort", f.sort_by.as_str());
    }
    ser.finish()
}

/// Decode a query string (leading `?` optional). Never fails: bad numbers
/// become 0, unknown sort keys become `InputOrder`, unknown conditions and
/// unknown keys are dropped.
pub fn from_query_string(qs: &str) -> SearchRequest {
    let qs = qs.strip_prefix('?').unwrap_or(qs);
    let mut req = SearchRequest::default();
    for (key, value) in form_urlencoded::parse(qs.as_bytes()) {
        match key.as_ref() {
            "q" => req.query = value.into_owned(),
            "category" => req.filters.category = value.into_owned(),
            "condition" => req.filters.condition = Condition::parse(&value),
            "minPrice" => req.filters.min_price = parse_amount(&value),
            "maxPrice" => req.filters.max_price = parse_amount(&value),
            "location" => req.filters.location = value.into_owned(),
            "sort" => req.filters.sort_by = SortBy::parse(&value),
            _ => {}
        }
    }
    req
}

fn parse_amount(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_encode_to_empty() {
        assert_eq!(to_query_string(&SearchRequest::default()), "");
    }

    #[test]
    fn test_encodes_active_filters() {
        let req = SearchRequest {
            query: "leather jacket".into(),
            filters: FilterConfig {
                category: "Home & Garden".into(),
                condition: Some(Condition::LikeNew),
                min_price: 50.0,
                max_price: 0.0,
                location: "".into(),
                sort_by: SortBy::PriceLow,
            },
        };
        assert_eq!(
            to_query_string(&req),
            "q=leather+jacket&category=Home+%26+Garden&condition=LIKE_NEW&minPrice=50&sort=price_low"
        );
    }

    #[test]
    fn test_decode_is_lenient() {
        let req = from_query_string("?q=bike&minPrice=abc&maxPrice=900&condition=shiny&sort=weird&x=1");
        assert_eq!(req.query, "bike");
        assert_eq!(req.filters.min_price, 0.0);
        assert_eq!(req.filters.max_price, 900.0);
        assert_eq!(req.filters.condition, None);
        assert_eq!(req.filters.sort_by, SortBy::InputOrder);
        assert_eq!(req.filters.category, "All");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let req = SearchRequest {
            query: "mac".into(),
            filters: FilterConfig {
                category: "Electronics".into(),
                location: "Auckland".into(),
                sort_by: SortBy::Popular,
                ..Default::default()
            },
        };
        assert_eq!(from_query_string(&to_query_string(&req)), req);
    }
}
