//! Request parameter extraction for the store pages.
//!
//! Every field a handler needs is pulled out of an explicit bag and checked
//! at the boundary; a missing field is a 400 naming the field, not a crash
//! further down.

use std::collections::HashMap;

use super::error::PageError;

/// A request's parameters: form fields on POST, or the query string merged
/// with path captures on GET.
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Merge path captures into the query-string map. Capture names starting
    /// with `_` are router-internal and skipped. Path values win over query
    /// values of the same name.
    pub fn merged<'a>(
        query: HashMap<String, String>,
        path: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut map = query;
        for (key, value) in path {
            if key.starts_with('_') {
                continue;
            }
            map.insert(key.to_string(), value.to_string());
        }
        Self(map)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Look up a required field, surfacing a bad-request error naming the
    /// field when it is absent.
    pub fn require(&self, field: &str) -> Result<String, PageError> {
        self.get(field)
            .map(str::to_string)
            .ok_or_else(|| PageError::bad_request(format!("Missing required field `{field}`")))
    }
}

/// Fields of a completed purchase (POST /buy).
///
/// Price and quantity are required and checked but are not part of the
/// persisted activity line.
pub struct PurchaseParams {
    pub category: String,
    pub price: String,
    pub item: String,
    pub ad: String,
    pub quantity: String,
}

impl PurchaseParams {
    pub fn read(params: &Params) -> Result<Self, PageError> {
        Ok(Self {
            category: params.require("Category")?,
            price: params.require("Price")?,
            item: params.require("Item")?,
            ad: params.require("Ad")?,
            quantity: params.require("Quantity")?,
        })
    }
}

/// Fields of a product-detail view (GET /buy).
pub struct BrowseParams {
    pub category: String,
    pub price: String,
    pub item: String,
    pub desc: String,
}

impl BrowseParams {
    pub fn read(params: &Params) -> Result<Self, PageError> {
        Ok(Self {
            category: params.require("Category")?,
            price: params.require("Price")?,
            item: params.require("Item")?,
            desc: params.require("Desc")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_require_present_field() {
        let params = Params::new(map(&[("uname", "alice")]));
        assert_eq!(params.require("uname").unwrap(), "alice");
    }

    #[test]
    fn test_require_missing_field_names_it() {
        let params = Params::new(map(&[]));
        let err = params.require("uname").unwrap_err();
        assert!(err.message().contains("uname"));
    }

    #[test]
    fn test_merge_skips_internal_captures() {
        let params = Params::merged(
            map(&[("Category", "Books")]),
            vec![("Item", "Novel"), ("_route", "buy")],
        );
        assert_eq!(params.get("Category"), Some("Books"));
        assert_eq!(params.get("Item"), Some("Novel"));
        assert_eq!(params.get("_route"), None);
    }

    #[test]
    fn test_merge_path_value_wins() {
        let params = Params::merged(map(&[("Item", "Novel")]), vec![("Item", "Atlas")]);
        assert_eq!(params.get("Item"), Some("Atlas"));
    }

    #[test]
    fn test_browse_params_require_all_fields() {
        let params = Params::new(map(&[
            ("Category", "Books"),
            ("Price", "9.99"),
            ("Item", "Novel"),
        ]));
        let err = BrowseParams::read(&params).unwrap_err();
        assert!(err.message().contains("Desc"));
    }

    #[test]
    fn test_purchase_params_read() {
        let params = Params::new(map(&[
            ("Category", "Books"),
            ("Price", "9.99"),
            ("Item", "Novel"),
            ("Ad", "ad42"),
            ("Quantity", "1"),
        ]));
        let order = PurchaseParams::read(&params).unwrap();
        assert_eq!(order.ad, "ad42");
        assert_eq!(order.quantity, "1");
    }
}
