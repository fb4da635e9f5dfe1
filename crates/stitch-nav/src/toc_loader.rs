//! Loading `docset.yml` and nested `toc.yml` files into [`TocEntry`] values.

use stitch_config::{DocsetFile, TocFile, TocItem};
use stitch_storage::Storage;

use crate::diagnostics::DiagnosticsCollector;
use crate::toc::{CrossLinkRef, FileRef, FolderRef, TocEntry, TocRef};
use crate::tree::{join_path, parent_dir};

/// Candidate names of the documentation set file, in lookup order.
pub const DOCSET_FILENAMES: [&str; 2] = ["docset.yml", "_docset.yml"];

/// Name of a nested table of contents file.
pub const TOC_FILENAME: &str = "toc.yml";

/// A loaded documentation set configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocsetToc {
    /// Project title.
    pub project: Option<String>,
    /// Repositories the set links to.
    pub cross_links: Vec<String>,
    /// Expanded top-level entries.
    pub entries: Vec<TocEntry>,
    /// Path of the docset file the entries came from.
    pub config_path: String,
}

/// Expands raw YAML entries, reading nested files through storage.
pub struct TocLoader<'a> {
    storage: &'a dyn Storage,
    diagnostics: &'a DiagnosticsCollector,
}

fn normalize_name(name: &str) -> String {
    let stem = name.strip_suffix(".md").unwrap_or(name);
    stem.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl<'a> TocLoader<'a> {
    /// Create a loader.
    #[must_use]
    pub fn new(storage: &'a dyn Storage, diagnostics: &'a DiagnosticsCollector) -> Self {
        Self {
            storage,
            diagnostics,
        }
    }

    /// Load the documentation set file.
    ///
    /// Returns `None` after reporting an error if no docset file exists or
    /// it can't be parsed.
    pub fn load(&self) -> Option<DocsetToc> {
        let Some(config_path) = DOCSET_FILENAMES
            .iter()
            .find(|name| self.storage.exists(name))
        else {
            self.diagnostics.emit_error(
                self.storage.describe(),
                format!(
                    "Documentation set configuration not found, expected one of: {}",
                    DOCSET_FILENAMES.join(", ")
                ),
            );
            return None;
        };

        let docset = self
            .storage
            .read(config_path)
            .map_err(|e| e.to_string())
            .and_then(|content| DocsetFile::from_yaml(&content).map_err(|e| e.to_string()));
        let docset = match docset {
            Ok(docset) => docset,
            Err(e) => {
                self.diagnostics
                    .emit_error(*config_path, format!("Could not load {config_path}: {e}"));
                return None;
            }
        };

        let entries = self.resolve_items(&docset.toc, "", config_path);
        Some(DocsetToc {
            project: docset.project,
            cross_links: docset.cross_links,
            entries,
            config_path: (*config_path).to_owned(),
        })
    }

    /// Expand raw items declared in `context`, joining paths to `parent_path`.
    pub fn resolve_items(&self, items: &[TocItem], parent_path: &str, context: &str) -> Vec<TocEntry> {
        items
            .iter()
            .filter_map(|item| self.resolve_item(item, parent_path, context))
            .collect()
    }

    fn resolve_item(&self, item: &TocItem, parent_path: &str, context: &str) -> Option<TocEntry> {
        if let Some(uri) = &item.crosslink {
            return Some(TocEntry::CrossLink(CrossLinkRef {
                uri: uri.clone(),
                title: item.title.clone(),
                hidden: item.is_hidden(),
                context: context.to_owned(),
            }));
        }
        if let Some(toc) = &item.toc {
            return self.resolve_toc(item, &join_path(parent_path, toc), context);
        }
        if let Some(folder) = &item.folder {
            return self.resolve_folder(item, &join_path(parent_path, folder), context);
        }
        if let Some(file) = item.file_path() {
            return Some(self.resolve_file(item, &join_path(parent_path, file), context));
        }

        self.diagnostics.emit_error(
            context,
            format!("Unknown table of contents entry under '{parent_path}'"),
        );
        None
    }

    fn resolve_toc(&self, item: &TocItem, path: &str, context: &str) -> Option<TocEntry> {
        if item.children.as_ref().is_some_and(|c| !c.is_empty()) {
            self.diagnostics.emit_error(
                context,
                format!(
                    "Table of contents '{path}' may not contain children, define children in '{path}/{TOC_FILENAME}' instead"
                ),
            );
        }

        let toc_path = join_path(path, TOC_FILENAME);
        if !self.storage.exists(&toc_path) {
            self.diagnostics.emit_error(
                context,
                format!("Table of contents file not found: {toc_path}"),
            );
            return None;
        }

        let toc = self
            .storage
            .read(&toc_path)
            .map_err(|e| e.to_string())
            .and_then(|content| TocFile::from_yaml(&content).map_err(|e| e.to_string()));
        let toc = match toc {
            Ok(toc) => toc,
            Err(e) => {
                self.diagnostics
                    .emit_error(&toc_path, format!("Could not load {toc_path}: {e}"));
                return None;
            }
        };

        let children = self.resolve_items(&toc.toc, path, &toc_path);
        Some(TocEntry::Toc(TocRef {
            path: path.to_owned(),
            hidden: item.is_hidden(),
            children,
            context: toc_path,
        }))
    }

    fn resolve_folder(&self, item: &TocItem, path: &str, context: &str) -> Option<TocEntry> {
        let mut children = Vec::new();

        if let Some(file) = item.file_path() {
            if file.contains('/') {
                self.diagnostics.emit_error(
                    context,
                    format!("File '{file}' in folder '{path}' may not contain '/', it must live directly inside the folder"),
                );
                return None;
            }
            let folder_name = file_name(path);
            if normalize_name(file) != normalize_name(folder_name) {
                self.diagnostics.emit_hint(
                    context,
                    format!("File '{file}' does not match the name of folder '{path}', consider renaming it to '{folder_name}.md'"),
                );
            }
            children.push(TocEntry::File(FileRef {
                path: join_path(path, file),
                hidden: false,
                children: Vec::new(),
                context: context.to_owned(),
            }));
        }

        match &item.children {
            Some(declared) => children.extend(self.resolve_items(declared, path, context)),
            None => {
                let declared: Vec<String> = children.iter().map(|c| c.path().to_owned()).collect();
                children.extend(
                    self.discover_files(path, context)
                        .into_iter()
                        .filter(|entry| !declared.iter().any(|d| d == entry.path())),
                );
            }
        }

        Some(TocEntry::Folder(FolderRef {
            path: path.to_owned(),
            hidden: item.is_hidden(),
            children,
            context: context.to_owned(),
        }))
    }

    /// Markdown files directly inside `path`: `index.md` first, then by name.
    fn discover_files(&self, path: &str, context: &str) -> Vec<TocEntry> {
        let entries = match self.storage.list_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                self.diagnostics
                    .emit_error(context, format!("Folder '{path}' could not be read: {e}"));
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.name)
            .filter(|name| {
                name.to_ascii_lowercase().ends_with(".md")
                    && !name.starts_with('_')
                    && !name.starts_with('.')
            })
            .collect();
        names.sort_by(|a, b| {
            let a_index = a.eq_ignore_ascii_case("index.md");
            let b_index = b.eq_ignore_ascii_case("index.md");
            b_index.cmp(&a_index).then_with(|| a.cmp(b))
        });

        names
            .into_iter()
            .map(|name| {
                TocEntry::File(FileRef {
                    path: join_path(path, &name),
                    hidden: false,
                    children: Vec::new(),
                    context: context.to_owned(),
                })
            })
            .collect()
    }

    fn resolve_file(&self, item: &TocItem, path: &str, context: &str) -> TocEntry {
        let declared = item.children.as_deref().unwrap_or_default();
        let mut children = Vec::new();

        if !declared.is_empty() {
            if file_name(path).eq_ignore_ascii_case("index.md") {
                self.diagnostics.emit_error(
                    context,
                    format!("File '{path}' is an index file and may not have children"),
                );
            } else {
                if path.contains('/') {
                    self.diagnostics.emit_hint(
                        context,
                        format!("File '{path}' has children and is deep linked, consider using 'folder' instead"),
                    );
                }
                children = self.resolve_items(declared, parent_dir(path), context);
            }
        }

        TocEntry::File(FileRef {
            path: path.to_owned(),
            hidden: item.is_hidden(),
            children,
            context: context.to_owned(),
        })
    }
}
