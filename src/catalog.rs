use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;
use crate::store::TokenStore;
use crate::types::{Category, CategoryId, Product, ProductId};

/// Fixed page size of the product listing; no further pagination.
pub const PRODUCT_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(rename = "productos")]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(rename = "categorias")]
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct ProductUpsert<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    #[serde(rename = "categoria")]
    category: &'a CategoryId,
}

/// An already-picked image, ready for multipart upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub data: Vec<u8>,
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
}

impl ImageFile {
    #[must_use]
    pub fn new(data: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Product catalog backed by the remote service, with the current listing
/// cached in memory.
///
/// The cache is replaced wholesale by [`load_products`](Self::load_products)
/// and edited in place by the create/update operations. Display order
/// follows server response order. Mutating operations take `&mut self`, so
/// two requests through the same handle cannot overlap.
pub struct CatalogContext<S> {
    api: ApiClient<S>,
    products: Vec<Product>,
}

impl<S: TokenStore> CatalogContext<S> {
    /// Create a catalog context with an empty product cache.
    #[must_use]
    pub fn new(api: ApiClient<S>) -> Self {
        Self {
            api,
            products: Vec::new(),
        }
    }

    /// The cached product listing, in server order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Fetch up to [`PRODUCT_PAGE_LIMIT`] products, replacing the entire
    /// cached list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Api`] on a
    /// non-2xx response; the cache is untouched on error.
    pub async fn load_products(&mut self) -> Result<(), Error> {
        let path = format!("/productos?limite={PRODUCT_PAGE_LIMIT}");
        let response = self
            .api
            .get::<ProductsResponse>(&path, "product listing")
            .await?;
        self.products = response.products;
        Ok(())
    }

    /// Create a product and append it to the cached list.
    ///
    /// A non-empty `name` and a valid `category_id` are the caller's
    /// contract; neither is validated here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Api`]; the cache is untouched
    /// on error.
    pub async fn add_product(
        &mut self,
        category_id: &CategoryId,
        name: &str,
    ) -> Result<Product, Error> {
        let body = ProductUpsert {
            name,
            category: category_id,
        };
        let product = self
            .api
            .post::<Product, _>("/productos", &body, "product creation")
            .await?;
        self.products.push(product.clone());
        Ok(product)
    }

    /// Update a product's name and category, replacing the matching cache
    /// entry in place (other entries and their order are untouched).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Api`]. On error the cache is
    /// left unchanged.
    pub async fn update_product(
        &mut self,
        category_id: &CategoryId,
        name: &str,
        product_id: &ProductId,
    ) -> Result<(), Error> {
        let body = ProductUpsert {
            name,
            category: category_id,
        };
        let path = format!("/productos/{product_id}");
        let updated = match self
            .api
            .put::<Product, _>(&path, &body, "product update")
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                tracing::debug!(product = %product_id, error = %e, "product update failed");
                return Err(e);
            }
        };
        if let Some(entry) = self.products.iter_mut().find(|p| p.id == *product_id) {
            *entry = updated;
        }
        Ok(())
    }

    /// Deletion is declared in the catalog contract but not supported by
    /// the backend.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub async fn delete_product(&mut self, _id: &ProductId) -> Result<(), Error> {
        Err(Error::Unsupported("product deletion"))
    }

    /// Fetch a single product without touching the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Api`].
    pub async fn load_product_by_id(&self, id: &ProductId) -> Result<Product, Error> {
        let path = format!("/productos/{id}");
        self.api.get::<Product>(&path, "product fetch").await
    }

    /// Fetch the category reference data. Read-only, never cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Api`].
    pub async fn load_categories(&self) -> Result<Vec<Category>, Error> {
        let response = self
            .api
            .get::<CategoriesResponse>("/categorias", "category listing")
            .await?;
        Ok(response.categories)
    }

    /// Upload an image for a product, as the multipart file field `archivo`.
    ///
    /// The backend associates the image server-side; the cached product
    /// record is NOT updated here. Re-fetch the product if the new image
    /// URL is needed for display.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] (including an unparseable MIME type) or
    /// [`Error::Api`].
    pub async fn upload_image(&self, image: ImageFile, product_id: &ProductId) -> Result<(), Error> {
        let part = reqwest::multipart::Part::bytes(image.data)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        let form = reqwest::multipart::Form::new().part("archivo", part);
        let path = format!("/uploads/productos/{product_id}");
        self.api.put_multipart(&path, form, "image upload").await
    }
}
