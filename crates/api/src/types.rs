//! Request and response types specific to the API boundary.

use core::fmt;

use devburger_core::{CategoryId, Email, Price, UserId};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Image types the API accepts for uploads.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// Bearer token issued by `POST /sessions`.
///
/// Implements `Debug` manually so the token never lands in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// A logged-in user, as returned by `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub admin: bool,
    pub token: AuthToken,
}

/// Body of `POST /users`.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// An uploaded image file on its way to the API.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Whether the content type is one the API stores.
    #[must_use]
    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_IMAGE_TYPES.contains(&self.content_type.as_str())
    }

    fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?)
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Multipart body for `POST /products` and `PUT /products/:id`.
#[derive(Debug, Clone)]
pub struct ProductPayload {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    pub offer: bool,
    /// Optional on update; the API keeps the current image when absent.
    pub image: Option<ImageUpload>,
}

impl ProductPayload {
    /// Text fields in wire order, without the file part.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("price", self.price.cents().to_string()),
            ("category_id", self.category_id.to_string()),
            ("offer", self.offer.to_string()),
        ]
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.fields() {
            form = form.text(name, value);
        }
        if let Some(image) = self.image {
            form = form.part("file", image.into_part()?);
        }
        Ok(form)
    }
}

/// Multipart body for `POST /categories`.
#[derive(Debug, Clone)]
pub struct CategoryPayload {
    pub name: String,
    pub image: ImageUpload,
}

impl CategoryPayload {
    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        Ok(Form::new()
            .text("name", self.name)
            .part("file", self.image.into_part()?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_from_api_json() {
        let json = r#"{
            "id": "7d8e9f00-0000-4000-8000-000000000002",
            "name": "Admin",
            "email": "admin@devburger.com",
            "admin": true,
            "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig"
        }"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert!(user.admin);
        assert_eq!(user.token.expose(), "eyJhbGciOiJIUzI1NiJ9.payload.sig");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let token = AuthToken::new("super-secret-token");
        assert!(!format!("{token:?}").contains("super-secret-token"));

        let user = NewUser {
            name: "Ana".to_string(),
            email: Email::parse("ana@example.com").unwrap(),
            password: "hunter22".to_string(),
        };
        let debug = format!("{user:?}");
        assert!(debug.contains("ana@example.com"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_product_fields_use_minor_units() {
        let payload = ProductPayload {
            name: "X-Tudo".to_string(),
            price: Price::from_cents(3450),
            category_id: CategoryId::new(2),
            offer: true,
            image: None,
        };
        assert_eq!(
            payload.fields(),
            vec![
                ("name", "X-Tudo".to_string()),
                ("price", "3450".to_string()),
                ("category_id", "2".to_string()),
                ("offer", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_accepted_image_types() {
        let mut image = ImageUpload {
            file_name: "burger.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50],
        };
        assert!(image.is_accepted_type());
        image.content_type = "image/gif".to_string();
        assert!(!image.is_accepted_type());
    }
}
