//! Content models built from markdown sources.
//!
//! Only the fields navigation needs are extracted: the title shown in menus
//! and an optional description. Everything else about the markdown belongs
//! to the rendering pipeline.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::storage::Storage;

static H1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("H1 pattern is a valid regex"));

/// What navigation knows about one markdown file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContentModel {
    /// Page title (front matter > H1 > filename).
    pub title: String,
    /// Title used in menus (front matter `navigation_title` > title).
    pub navigation_title: String,
    /// Description from front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContentModel {
    /// Content model whose menu title equals its title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            navigation_title: title.clone(),
            title,
            description: None,
        }
    }
}

/// Front matter fields read for navigation.
#[derive(Deserialize, Default)]
struct FrontMatter {
    title: Option<String>,
    navigation_title: Option<String>,
    description: Option<String>,
}

/// Split `---` delimited YAML front matter from the markdown body.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let yaml = &rest[..end];
            let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
            (Some(yaml), body)
        }
        None => (None, content),
    }
}

fn parse_front_matter(yaml: &str) -> FrontMatter {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return FrontMatter::default();
    }
    match serde_yaml::from_str(trimmed) {
        Ok(front_matter) => front_matter,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed front matter");
            FrontMatter::default()
        }
    }
}

/// Generate a title from a file name (`getting-started.md` -> `Getting Started`).
#[must_use]
pub fn title_from_filename(name: &str) -> String {
    let name = name.rsplit('/').next().unwrap_or(name);
    let name = name.strip_suffix(".md").unwrap_or(name);

    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the content model for `path`.
///
/// Returns `None` if the file can't be read. Callers turn that into a
/// diagnostic; a missing page never aborts a build.
pub fn load_content(storage: &dyn Storage, path: &str) -> Option<ContentModel> {
    let content = match storage.read(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path, error = %e, "Could not read content");
            return None;
        }
    };
    Some(content_model(path, &content))
}

fn content_model(path: &str, content: &str) -> ContentModel {
    let (yaml, body) = split_front_matter(content);
    let front_matter = yaml.map(parse_front_matter).unwrap_or_default();

    let title = front_matter
        .title
        .or_else(|| {
            H1_REGEX
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_owned())
        })
        .unwrap_or_else(|| title_from_filename(path));
    let navigation_title = front_matter
        .navigation_title
        .unwrap_or_else(|| title.clone());

    ContentModel {
        title,
        navigation_title,
        description: front_matter.description,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_title_from_h1() {
        let model = content_model("guide.md", "# User Guide\n\nContent.");
        assert_eq!(model.title, "User Guide");
        assert_eq!(model.navigation_title, "User Guide");
        assert_eq!(model.description, None);
    }

    #[test]
    fn test_front_matter_wins_over_h1() {
        let model = content_model(
            "guide.md",
            "---\ntitle: Front Title\nnavigation_title: Short\ndescription: About things\n---\n# Heading\n",
        );
        assert_eq!(model.title, "Front Title");
        assert_eq!(model.navigation_title, "Short");
        assert_eq!(model.description.as_deref(), Some("About things"));
    }

    #[test]
    fn test_h1_inside_front_matter_body_only() {
        let model = content_model("setup/install-guide.md", "---\ndescription: x\n---\nNo heading");
        assert_eq!(model.title, "Install Guide");
    }

    #[test]
    fn test_malformed_front_matter_falls_back() {
        let model = content_model("a.md", "---\ntitle: [unclosed\n---\n# Real\n");
        assert_eq!(model.title, "Real");
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let model = content_model("a.md", "---\ntitle: x\n# Heading\n");
        assert_eq!(model.title, "Heading");
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("getting-started.md"), "Getting Started");
        assert_eq!(title_from_filename("setup/api_reference.md"), "Api Reference");
        assert_eq!(title_from_filename("index"), "Index");
    }

    #[test]
    fn test_titled_model() {
        let model = ContentModel::titled("Home");
        assert_eq!(model.title, "Home");
        assert_eq!(model.navigation_title, "Home");
    }
}
