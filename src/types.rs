use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Backend user identifier (opaque string, `uid` on the wire).
///
/// Immutable, unique per account. Consumers store this as the sole link
/// to backend identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Product identifier (opaque string, `_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct ProductId(pub String);

/// Category identifier (opaque string, `_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Authenticated user record.
///
/// Immutable value received from the backend; replaced wholesale on each
/// sign-in, sign-up, or session renewal. Never persisted by this crate —
/// only the session token is durable, and that lives in the consumer's
/// [`TokenStore`](crate::TokenStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
    pub uid: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    /// Backend role tag, e.g. `ADMIN_ROLE` / `USER_ROLE`.
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(default)]
    pub img: Option<String>,
}

impl User {
    /// Whether the backend granted this user the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "ADMIN_ROLE"
    }
}

/// Catalog product. Identity is [`Product::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Image URL, when one has been uploaded for this product.
    #[serde(default)]
    pub img: Option<String>,
}

/// Read-only category reference data, fetched separately and used to
/// populate selection controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_wire_names() {
        let json = r#"{
            "uid": "u1",
            "nombre": "Ada",
            "correo": "ada@example.com",
            "rol": "ADMIN_ROLE",
            "estado": true,
            "google": false
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.uid, UserId::from("u1".to_string()));
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_admin());
        assert_eq!(user.img, None);
    }

    #[test]
    fn product_deserializes_embedded_category() {
        let json = r#"{
            "_id": "p1",
            "nombre": "Latte",
            "categoria": {"_id": "c1", "nombre": "Drinks"},
            "usuario": {"_id": "u1", "nombre": "Ada"},
            "disponible": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.to_string(), "p1");
        assert_eq!(product.category.id.to_string(), "c1");
        assert_eq!(product.category.name, "Drinks");
        assert_eq!(product.img, None);
    }

    #[test]
    fn id_serde_is_transparent() {
        let id = ProductId::from("p42".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p42\"");
        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn newtypes_prevent_mixing() {
        fn takes_product_id(_: &ProductId) {}
        fn takes_category_id(_: &CategoryId) {}

        let product = ProductId::from("id".to_string());
        let category = CategoryId::from("id".to_string());

        takes_product_id(&product);
        takes_category_id(&category);
        // takes_product_id(&category);  // Compile error!
        // takes_category_id(&product);  // Compile error!
    }
}
