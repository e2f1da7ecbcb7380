//! Catalog file loading

use std::fs;
use std::path::Path;

use feeder_core::Catalog;
use tracing::info;

use super::toml::{parse_catalog, ConfigError};

/// Read and parse a catalog file
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    info!("Loading catalog from {}", path.display());

    let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let catalog = parse_catalog(&input)?;

    info!("Loaded {} frames", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_shipped_catalog_loads() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("catalog.toml");
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
