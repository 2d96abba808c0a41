mod local;

use crate::config::APP_DATA_DIR;
use crate::error::{AppError, AppResult};
use crate::product::{Product, ProductId};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Source of truth for the product list.
pub trait ProductStore {
    /// Every product, in store order.
    fn all_products(&self) -> Vec<Product>;

    /// Insert `product` under a fresh id and return that id.
    fn add_product(&mut self, product: Product) -> AppResult<ProductId>;

    /// Replace the stored product with the same id. Returns the previous
    /// version, or `None` when the id is unknown (nothing is written).
    fn update_product(&mut self, product: Product) -> AppResult<Option<Product>>;

    /// Remove the listed products and return the ones that existed.
    fn delete_products(&mut self, ids: &[ProductId]) -> AppResult<Vec<Product>>;

    fn clear(&mut self) -> AppResult<()>;
}

/// Product list held in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryProductStore {
    products: Vec<Product>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    fn next_id(&self) -> ProductId {
        self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

impl ProductStore for MemoryProductStore {
    fn all_products(&self) -> Vec<Product> {
        self.products.clone()
    }

    fn add_product(&mut self, mut product: Product) -> AppResult<ProductId> {
        product.id = self.next_id();
        let id = product.id;
        self.products.push(product);
        Ok(id)
    }

    fn update_product(&mut self, product: Product) -> AppResult<Option<Product>> {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => Ok(Some(std::mem::replace(existing, product))),
            None => Ok(None),
        }
    }

    fn delete_products(&mut self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        let ids: HashSet<ProductId> = ids.iter().copied().collect();
        let (removed, kept): (Vec<Product>, Vec<Product>) = self
            .products
            .drain(..)
            .partition(|p| ids.contains(&p.id));
        self.products = kept;
        Ok(removed)
    }

    fn clear(&mut self) -> AppResult<()> {
        self.products.clear();
        Ok(())
    }
}

/// Product list persisted as pretty JSON in the application data directory.
/// Every mutation is written through before returning.
#[derive(Debug)]
pub struct JsonProductStore {
    data: MemoryProductStore,
    app_data_path: PathBuf,
}

impl JsonProductStore {
    /// Open the store in the platform's local data directory.
    pub fn new() -> AppResult<Self> {
        let app_data_path = dirs::data_local_dir()
            .ok_or_else(|| AppError::storage("Failed to get local data dir"))?
            .join(APP_DATA_DIR);
        Self::open(app_data_path)
    }

    /// Open the store rooted at `app_data_path`, creating the directory.
    pub fn open(app_data_path: PathBuf) -> AppResult<Self> {
        fs::create_dir_all(&app_data_path)?;
        let products = local::load_local(&app_data_path)?;
        info!(
            count = products.len(),
            path = %app_data_path.display(),
            "product store opened"
        );
        Ok(Self {
            data: MemoryProductStore::with_products(products),
            app_data_path,
        })
    }

    pub fn app_data_path(&self) -> &Path {
        &self.app_data_path
    }

    fn save(&self) -> AppResult<()> {
        local::save_local(&self.app_data_path, &self.data.products)
    }
}

impl ProductStore for JsonProductStore {
    fn all_products(&self) -> Vec<Product> {
        self.data.all_products()
    }

    fn add_product(&mut self, product: Product) -> AppResult<ProductId> {
        let id = self.data.add_product(product)?;
        self.save()?;
        Ok(id)
    }

    fn update_product(&mut self, product: Product) -> AppResult<Option<Product>> {
        let previous = self.data.update_product(product)?;
        if previous.is_some() {
            self.save()?;
        }
        Ok(previous)
    }

    fn delete_products(&mut self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        let removed = self.data.delete_products(ids)?;
        if !removed.is_empty() {
            self.save()?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> AppResult<()> {
        self.data.clear()?;
        self.save()
    }
}
