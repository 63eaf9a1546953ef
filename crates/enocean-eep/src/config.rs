/// Limits applied when loading a profile catalog from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Maximum bytes accepted for a single catalog file.
    pub max_catalog_bytes: usize,
    /// Maximum number of catalog files loaded from a directory.
    pub max_catalog_files: usize,
    /// When true, a profile defined twice is an error instead of the later one winning.
    pub reject_duplicates: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_catalog_bytes: 4 * 1024 * 1024,
            max_catalog_files: 64,
            reject_duplicates: true,
        }
    }
}
