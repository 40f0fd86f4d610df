use serde::{Deserialize, Serialize};

/// A single stock record.
///
/// Field names serialize in camelCase (`productName`, `sku`, ...) so the
/// persisted blob keeps the same shape across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub quantity: i64,
    pub supplier: String,
    pub price: f64,
    pub location: String,
}

impl InventoryItem {
    /// Whether this item carries the given SKU (exact, case-sensitive match).
    pub fn has_sku(&self, sku: &str) -> bool {
        self.sku == sku
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> InventoryItem {
        InventoryItem {
            product_name: "Widget".to_string(),
            sku: "W1".to_string(),
            category: "Hardware".to_string(),
            quantity: 10,
            supplier: "Acme".to_string(),
            price: 9.99,
            location: "A1".to_string(),
        }
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(widget()).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["category", "location", "price", "productName", "quantity", "sku", "supplier"]
        );
        assert_eq!(obj["productName"], "Widget");
        assert_eq!(obj["quantity"], 10);
        assert_eq!(obj["price"], 9.99);
    }

    #[test]
    fn reads_blob_object_written_by_browser_version() {
        let raw = concat!(
            r#"{"productName":"Widget","sku":"W1","category":"Hardware","quantity":10,"#,
            r#""supplier":"Acme","price":9.99,"location":"A1"}"#,
        );
        let item: InventoryItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item, widget());
    }

    #[test]
    fn sku_match_is_exact() {
        let item = widget();
        assert!(item.has_sku("W1"));
        assert!(!item.has_sku("w1"));
        assert!(!item.has_sku("W1 "));
    }
}
