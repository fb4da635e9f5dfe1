//! Storage abstraction for stitch documentation sources.
//!
//! A documentation set is a directory of markdown files plus its `docset.yml`
//! and nested `toc.yml` files. This crate hides where those files live behind
//! the [`Storage`] trait so the navigation builder can be tested in memory.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()`, `exists()`, and `list_dir()` methods
//! - [`FsStorage`] implementation rooted at a documentation source directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//! - [`load_content`] to build a [`ContentModel`] from front matter and headings
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use stitch_storage::{FsStorage, Storage, load_content};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! let model = load_content(&storage, "setup/install.md");
//! ```

mod content;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use content::{ContentModel, load_content, title_from_filename};
pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{DirEntry, Storage, StorageError, StorageErrorKind};
