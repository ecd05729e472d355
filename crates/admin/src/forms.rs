//! Multipart catalog forms.
//!
//! Product and category forms arrive as `multipart/form-data` because they
//! carry an image. They are read into plain structs first so a failed
//! submission can be re-rendered with exactly what the admin typed.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use devburger_api::{CategoryPayload, ImageUpload, ProductPayload};
use devburger_core::{CategoryId, FieldErrors, Price, Product};

pub const NAME_REQUIRED: &str = "Digite o nome do produto";
pub const CATEGORY_REQUIRED: &str = "Escolha uma categoria";
pub const FILE_REQUIRED: &str = "Carregue um arquivo";
pub const FILE_TYPE: &str = "Aceitamos apenas imagens PNG ou JPEG";
pub const CATEGORY_NAME_REQUIRED: &str = "Digite o nome da categoria";

/// Read an optional file field. An empty file input is `None`.
async fn read_image(field: Field<'_>) -> Result<Option<ImageUpload>, MultipartError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await?;

    if file_name.is_empty() || bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Check an uploaded image against the required flag and accepted types.
fn check_image(
    image: Option<&ImageUpload>,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<ImageUpload> {
    match image {
        None if required => {
            errors.add("file", FILE_REQUIRED);
            None
        }
        None => None,
        Some(image) if !image.is_accepted_type() => {
            errors.add("file", FILE_TYPE);
            None
        }
        Some(image) => Some(image.clone()),
    }
}

// =============================================================================
// Product Form
// =============================================================================

/// Raw product form values, as typed.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    /// Reais with a comma separator, e.g. `"25,90"`.
    pub price: String,
    pub category_id: String,
    pub offer: bool,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Prefill the edit form from the stored product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_input(),
            category_id: product.category_id.to_string(),
            offer: product.offer,
            image: None,
        }
    }

    /// Read the form from a multipart body.
    ///
    /// Unknown fields are skipped. A checked `offer` box arrives as `on` or
    /// `true`; an unchecked one is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid multipart.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "name" => form.name = field.text().await?,
                "price" => form.price = field.text().await?,
                "category_id" => form.category_id = field.text().await?,
                "offer" => form.offer = matches!(field.text().await?.as_str(), "on" | "true"),
                "file" => form.image = read_image(field).await?,
                _ => {}
            }
        }

        Ok(form)
    }

    /// The selected category, if a valid one was chosen.
    #[must_use]
    pub fn selected_category(&self) -> Option<i32> {
        self.category_id
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
    }

    /// Validate every field and build the API payload.
    ///
    /// `image_required` is true for new products; edits keep the stored
    /// image when no file is sent.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(&self, image_required: bool) -> Result<ProductPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", NAME_REQUIRED);
        }

        let price = Price::parse_input(&self.price)
            .inspect_err(|e| errors.add("price", e.to_string()))
            .ok();

        let category_id = self.selected_category();
        if category_id.is_none() {
            errors.add("category_id", CATEGORY_REQUIRED);
        }

        let image = check_image(self.image.as_ref(), image_required, &mut errors);

        match (price, category_id) {
            (Some(price), Some(category_id)) if errors.is_empty() => Ok(ProductPayload {
                name: name.to_string(),
                price,
                category_id: CategoryId::new(category_id),
                offer: self.offer,
                image,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Category Form
// =============================================================================

/// Raw category form values.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
    pub image: Option<ImageUpload>,
}

impl CategoryForm {
    /// Read the form from a multipart body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid multipart.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "name" => form.name = field.text().await?,
                "file" => form.image = read_image(field).await?,
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate and build the API payload. Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<CategoryPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", CATEGORY_NAME_REQUIRED);
        }

        let image = check_image(self.image.as_ref(), true, &mut errors);

        match image {
            Some(image) if errors.is_empty() => Ok(CategoryPayload {
                name: name.to_string(),
                image,
            }),
            _ => Err(errors),
        }
    }
}
