use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const PRODUCT_MODEL: &str = "Product";

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct ProductId(pub uuid::Uuid);

impl ProductId {
    pub fn new() -> Self {
        ProductId(uuid::Uuid::new_v4())
    }

    /// Store-side cast of a raw identifier. Only the hyphenated form is a key.
    pub fn cast(raw: &str) -> Result<Self, CastError> {
        if raw.len() != 36 {
            return Err(CastError::from_text(CastKind::Id, "id", raw));
        }
        raw.parse::<ProductId>()
            .map_err(|_| CastError::from_text(CastKind::Id, "id", raw))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(ProductId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Product {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
        }
    }
}

/// Untrusted create payload. Only the four schema fields are kept; anything
/// else in the body is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

/// A draft that passed casting and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

impl ProductDraft {
    /// Casts every field, then checks required ones. All failures are
    /// collected so the message lists each offending path.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let mut err = ValidationError::new(PRODUCT_MODEL);

        let name = cast_string("name", self.name.as_ref())
            .map_err(|e| err.push(e))
            .ok()
            .flatten();
        let name_missing = name.as_deref().is_none_or(str::is_empty);
        if name_missing && !err.errors.iter().any(|e| e.path == "name") {
            err.push(FieldError::required("name"));
        }

        let description = cast_string("description", self.description.as_ref())
            .map_err(|e| err.push(e))
            .ok()
            .flatten();

        let price = match cast_number("price", self.price.as_ref()) {
            Ok(Some(p)) => Some(p),
            Ok(None) => {
                err.push(FieldError::required("price"));
                None
            }
            Err(e) => {
                err.push(e);
                None
            }
        };

        let category = cast_string("category", self.category.as_ref())
            .map_err(|e| err.push(e))
            .ok()
            .flatten();

        match (name, price) {
            (Some(name), Some(price)) if err.is_empty() => Ok(NewProduct {
                name,
                description,
                price,
                category,
            }),
            _ => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(body: Value) -> ProductDraft {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_full_payload_and_ignores_extras() {
        let new = draft(json!({
            "name": "Desk Lamp",
            "description": "LED",
            "price": 24.99,
            "category": "lighting",
            "stock": 40
        }))
        .validate()
        .unwrap();

        assert_eq!(new.name, "Desk Lamp");
        assert_eq!(new.description.as_deref(), Some("LED"));
        assert_eq!(new.price, 24.99);
        assert_eq!(new.category.as_deref(), Some("lighting"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let new = draft(json!({"name": "Mug", "price": "8"})).validate().unwrap();
        assert_eq!(new.price, 8.0);
        assert!(new.description.is_none());
        assert!(new.category.is_none());
    }

    #[test]
    fn missing_name_and_price_are_both_reported() {
        let err = draft(json!({"description": "x"})).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product validation failed: name: Path `name` is required., price: Path `price` is required."
        );
    }

    #[test]
    fn empty_name_is_missing() {
        let err = draft(json!({"name": "", "price": 1})).validate().unwrap_err();
        assert_eq!(err.errors, vec![FieldError::required("name")]);
    }

    #[test]
    fn bad_price_is_a_cast_failure() {
        let err = draft(json!({"name": "Mug", "price": "cheap"}))
            .validate()
            .unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].path, "price");
        assert!(err.errors[0].message.starts_with("Cast to Number failed"));
    }

    #[test]
    fn id_cast_requires_hyphenated_uuid() {
        let id = ProductId::new();
        assert_eq!(ProductId::cast(&id.to_string()).unwrap(), id);

        let simple = id.0.simple().to_string();
        assert_eq!(ProductId::cast(&simple).unwrap_err().kind, CastKind::Id);
        assert_eq!(ProductId::cast("42").unwrap_err().kind, CastKind::Id);
        assert!(ProductId::cast("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz").is_err());
    }

    #[test]
    fn serializes_without_absent_optionals() {
        let product = Product {
            id: ProductId(uuid::Uuid::nil()),
            name: "Mug".into(),
            description: None,
            price: 8.0,
            category: None,
        };
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({"id": "00000000-0000-0000-0000-000000000000", "name": "Mug", "price": 8.0})
        );
    }
}
