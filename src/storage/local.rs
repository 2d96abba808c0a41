use crate::config::PRODUCTS_FILE;
use crate::error::AppResult;
use crate::product::Product;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load products from the local JSON file. A missing file is an empty pantry.
pub fn load_local(app_data_path: &Path) -> AppResult<Vec<Product>> {
    let path = app_data_path.join(PRODUCTS_FILE);

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let products: Vec<Product> = serde_json::from_str(&content)?;
    debug!(count = products.len(), path = %path.display(), "loaded products");
    Ok(products)
}

/// Save products to the local JSON file
pub fn save_local(app_data_path: &Path, products: &[Product]) -> AppResult<()> {
    let path = app_data_path.join(PRODUCTS_FILE);
    let content = serde_json::to_string_pretty(products)?;
    fs::write(&path, content)?;
    debug!(count = products.len(), path = %path.display(), "saved products");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let dir = TempDir::new().unwrap();
        let products = load_local(dir.path()).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_save_and_load_keeps_order() {
        let dir = TempDir::new().unwrap();

        let mut first = Product::new("Honey".to_string(), "2031-01-01".to_string());
        first.id = 2;
        let mut second = Product::new("Flour".to_string(), "-".to_string());
        second.id = 1;

        save_local(dir.path(), &[first, second]).unwrap();
        let loaded = load_local(dir.path()).unwrap();

        let names: Vec<&str> = loaded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Honey", "Flour"]);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PRODUCTS_FILE), "{ broken").unwrap();
        assert!(matches!(load_local(dir.path()), Err(AppError::Storage(_))));
    }
}
