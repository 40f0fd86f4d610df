//! Form-field representation of an item.
//!
//! The presentation surface hands back raw text per field; parsing into an
//! [`InventoryItem`] happens here so every surface gets the same rules.

use stockroom_core::{DomainError, DomainResult};

use crate::item::InventoryItem;

/// The seven editable fields, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormField {
    ProductName,
    Sku,
    Category,
    Quantity,
    Supplier,
    Price,
    Location,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::ProductName,
        FormField::Sku,
        FormField::Category,
        FormField::Quantity,
        FormField::Supplier,
        FormField::Price,
        FormField::Location,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::ProductName => "Product name",
            FormField::Sku => "SKU",
            FormField::Category => "Category",
            FormField::Quantity => "Quantity",
            FormField::Supplier => "Supplier",
            FormField::Price => "Price",
            FormField::Location => "Location",
        }
    }
}

/// Raw, unparsed form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub product_name: String,
    pub sku: String,
    pub category: String,
    pub quantity: String,
    pub supplier: String,
    pub price: String,
    pub location: String,
}

impl ItemForm {
    /// Populate the form from an existing item (edit mode).
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            sku: item.sku.clone(),
            category: item.category.clone(),
            quantity: item.quantity.to_string(),
            supplier: item.supplier.clone(),
            price: item.price.to_string(),
            location: item.location.clone(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ProductName => &self.product_name,
            FormField::Sku => &self.sku,
            FormField::Category => &self.category,
            FormField::Quantity => &self.quantity,
            FormField::Supplier => &self.supplier,
            FormField::Price => &self.price,
            FormField::Location => &self.location,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::ProductName => self.product_name = value,
            FormField::Sku => self.sku = value,
            FormField::Category => self.category = value,
            FormField::Quantity => self.quantity = value,
            FormField::Supplier => self.supplier = value,
            FormField::Price => self.price = value,
            FormField::Location => self.location = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trim text fields and parse the numeric ones.
    ///
    /// Only numeric parsing can fail; text fields are accepted as-is (empty
    /// included).
    pub fn parse(&self) -> DomainResult<InventoryItem> {
        let quantity = self.quantity.trim();
        let quantity = quantity.parse::<i64>().map_err(|_| {
            DomainError::validation(format!("quantity must be a whole number, got {quantity:?}"))
        })?;

        let price = self.price.trim();
        let price = price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| {
                DomainError::validation(format!("price must be a decimal number, got {price:?}"))
            })?;

        Ok(InventoryItem {
            product_name: self.product_name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            category: self.category.trim().to_string(),
            quantity,
            supplier: self.supplier.trim().to_string(),
            price,
            location: self.location.trim().to_string(),
        })
    }
}
