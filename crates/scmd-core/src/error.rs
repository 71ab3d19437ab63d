//! Errors owned by the core crate.

use std::path::PathBuf;

use thiserror::Error;

use scmd_protocols::{ProviderKind, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no command with id {0}")]
    NotFound(i64),

    #[error("command already exists: {0}")]
    Duplicate(String),

    #[error("cannot import {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("provider already registered: {0}")]
    AlreadyRegistered(ProviderKind),
}
