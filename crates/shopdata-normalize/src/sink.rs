//! File sources and sinks: JSON in, JSON/CSV out, and in-place field stripping.
//!
//! Every write lands in a sibling `*.tmp` file first and is renamed over the
//! target only once fully flushed, so a failed write leaves any existing
//! target untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use shopdata_core::NormalizedProduct;

use crate::error::NormalizeError;

/// Column order of the flattened CSV export.
pub const CSV_HEADERS: [&str; 19] = [
    "id",
    "name",
    "title",
    "brand",
    "price",
    "priceNumeric",
    "priceOld",
    "priceOldNumeric",
    "discount",
    "image",
    "timestamp",
    "specCount",
    "storageCount",
    "colorCount",
    "imageCount",
    "specifications",
    "storageOptions",
    "colorOptions",
    "images",
];

/// Result of [`strip_fields`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOutcome {
    /// Number of records in the file.
    pub records: usize,
    /// Number of records that had at least one of the keys removed.
    pub removed: usize,
}

/// Reads and parses a JSON document of any shape.
///
/// # Errors
///
/// Returns [`NormalizeError::Io`] if the file cannot be read and
/// [`NormalizeError::Json`] if it is not valid JSON.
pub fn read_json_value(path: &Path) -> Result<Value, NormalizeError> {
    let bytes = fs::read(path).map_err(|source| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| NormalizeError::Json {
        context: path.display().to_string(),
        source,
    })
}

/// Reads a processed JSON array back into products.
///
/// Elements that do not deserialize are skipped with a warning.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or is not a JSON array.
pub fn read_products(path: &Path) -> Result<Vec<NormalizedProduct>, NormalizeError> {
    let Value::Array(items) = read_json_value(path)? else {
        return Err(NormalizeError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    let mut products = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<NormalizedProduct>(item) {
            Ok(product) => products.push(product),
            Err(e) => {
                tracing::warn!(path = %path.display(), index, error = %e, "skipping malformed product");
            }
        }
    }
    Ok(products)
}

/// Writes `data` as pretty-printed UTF-8 JSON. Non-ASCII text is kept as is.
///
/// # Errors
///
/// Fails on serialization or I/O errors; the target is left unchanged.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), NormalizeError> {
    let mut bytes =
        serde_json::to_vec_pretty(data).map_err(|source| NormalizeError::Json {
            context: path.display().to_string(),
            source,
        })?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), "wrote JSON");
    Ok(())
}

/// Writes one CSV row per product, nested structures embedded as JSON text.
///
/// The header row is always written, even for an empty batch.
///
/// # Errors
///
/// Fails on CSV encoding or I/O errors; the target is left unchanged.
pub fn write_csv(path: &Path, products: &[NormalizedProduct]) -> Result<(), NormalizeError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS)?;
    for product in products {
        wtr.serialize(CsvRow::from_product(product)?)?;
    }
    let bytes = wtr.into_inner().map_err(|e| NormalizeError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), rows = products.len(), "wrote CSV");
    Ok(())
}

/// Removes `keys` from every object in the JSON array stored at `path`,
/// rewriting the file in place.
///
/// With `backup`, the untouched document is first copied to `<path>.backup`.
///
/// # Errors
///
/// Fails when the file cannot be read, parsed or written, or is not a JSON
/// array.
pub fn strip_fields(
    path: &Path,
    keys: &[String],
    backup: bool,
) -> Result<StripOutcome, NormalizeError> {
    let mut document = read_json_value(path)?;
    let Value::Array(items) = &mut document else {
        return Err(NormalizeError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    if backup {
        let backup_path = sibling_path(path, "backup");
        fs::copy(path, &backup_path).map_err(|source| NormalizeError::Io {
            path: backup_path.clone(),
            source,
        })?;
        tracing::info!(path = %backup_path.display(), "wrote backup");
    }

    let mut outcome = StripOutcome {
        records: items.len(),
        removed: 0,
    };
    for item in items.iter_mut() {
        let Value::Object(obj) = item else {
            continue;
        };
        let mut touched = false;
        for key in keys {
            touched |= obj.shift_remove(key).is_some();
        }
        if touched {
            outcome.removed += 1;
        }
    }

    write_json(path, &document)?;
    tracing::info!(
        path = %path.display(),
        keys = ?keys,
        removed = outcome.removed,
        records = outcome.records,
        "stripped fields"
    );
    Ok(outcome)
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    title: &'a str,
    brand: &'a str,
    price: &'a str,
    price_numeric: u64,
    price_old: &'a str,
    price_old_numeric: u64,
    discount: &'a str,
    image: &'a str,
    timestamp: &'a str,
    spec_count: usize,
    storage_count: usize,
    color_count: usize,
    image_count: usize,
    specifications: String,
    storage_options: String,
    color_options: String,
    images: String,
}

impl<'a> CsvRow<'a> {
    fn from_product(p: &'a NormalizedProduct) -> Result<Self, NormalizeError> {
        Ok(Self {
            id: p.id.as_deref().unwrap_or_default(),
            name: &p.name,
            title: &p.title,
            brand: &p.brand,
            price: &p.price.value,
            price_numeric: p.price.numeric,
            price_old: &p.price_old.value,
            price_old_numeric: p.price_old.numeric,
            discount: &p.discount,
            image: p.thumbnail(),
            timestamp: &p.timestamp.raw,
            spec_count: p.summary.spec_count,
            storage_count: p.summary.storage_count,
            color_count: p.summary.color_count,
            image_count: p.summary.image_count,
            specifications: embed("specifications", &p.specifications)?,
            storage_options: embed("storageOptions", &p.storage_options)?,
            color_options: embed("colorOptions", &p.color_options)?,
            images: embed("images", &p.images)?,
        })
    }
}

fn embed<T: Serialize>(column: &str, value: &T) -> Result<String, NormalizeError> {
    serde_json::to_string(value).map_err(|source| NormalizeError::Json {
        context: format!("CSV column {column}"),
        source,
    })
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), NormalizeError> {
    let io_err = |source: std::io::Error| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let temp_path = sibling_path(path, "tmp");
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(source));
    }
    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        io_err(source)
    })
}
