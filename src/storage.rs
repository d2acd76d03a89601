// src/storage.rs

//! Object storage for listing photos.
//!
//! Uploaded files live under one directory and are served back from
//! `/uploads/<key>`. Keys are random, so two uploads never collide.

use rand::rngs::OsRng;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::auth::token::generate_token;
use crate::errors::ServerError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const PUBLIC_PREFIX: &str = "/uploads/";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    /// Public URL the site serves the object from.
    pub url: String,
}

pub trait ObjectStore {
    fn put(&self, name_hint: &str, bytes: &[u8]) -> Result<StoredObject, ServerError>;
    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), ServerError>;
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServerError>;
}

/// Local-filesystem bucket.
#[derive(Debug, Clone)]
pub struct LocalBucket {
    root: PathBuf,
}

impl LocalBucket {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_root(&self) -> Result<(), ServerError> {
        fs::create_dir_all(&self.root)?;
        info!(dir = %self.root.display(), "upload bucket ready");
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ServerError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

/// Lowercased extension of an uploaded file name, if it is an accepted image type.
pub fn image_extension(name_hint: &str) -> Result<String, ServerError> {
    let ext = Path::new(name_hint.trim())
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ServerError::BadRequest(format!(
            "Formato de imagem não suportado: {name_hint:?}"
        )))
    }
}

fn validate_key(key: &str) -> Result<(), ServerError> {
    if key.is_empty()
        || key.contains("..")
        || key.contains('/')
        || key.contains('\\')
        || key.starts_with('.')
    {
        return Err(ServerError::BadRequest(format!("invalid object key {key:?}")));
    }
    Ok(())
}

impl ObjectStore for LocalBucket {
    fn put(&self, name_hint: &str, bytes: &[u8]) -> Result<StoredObject, ServerError> {
        let ext = image_extension(name_hint)?;
        if bytes.is_empty() {
            return Err(ServerError::BadRequest("Arquivo vazio".into()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ServerError::BadRequest(format!(
                "Arquivo maior que {} MB",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        fs::create_dir_all(&self.root)?;
        let key = format!("{}.{ext}", generate_token(&mut OsRng, 16));
        fs::write(self.path_for(&key)?, bytes)?;
        debug!(key = %key, size = bytes.len(), "stored object");

        Ok(StoredObject {
            url: format!("{PUBLIC_PREFIX}{key}"),
            key,
        })
    }

    fn delete(&self, key: &str) -> Result<(), ServerError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ServerError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn content_type_for(key: &str) -> mime::Mime {
    let ext = Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "webp" => "image/webp"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        "css" => mime::TEXT_CSS_UTF_8,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
