//! File type detection from file extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// File types rules can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Java,
    Yaml,
    Json,
    Toml,
    Markdown,
    Shell,
}

impl FileType {
    /// Detect the file type from an extension. Case-insensitive.
    pub fn from_extension(ext: Option<&str>) -> Option<FileType> {
        let ext = ext?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyi" => Some(FileType::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(FileType::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(FileType::TypeScript),
            "rs" => Some(FileType::Rust),
            "go" => Some(FileType::Go),
            "java" => Some(FileType::Java),
            "yaml" | "yml" => Some(FileType::Yaml),
            "json" => Some(FileType::Json),
            "toml" => Some(FileType::Toml),
            "md" | "markdown" => Some(FileType::Markdown),
            "sh" | "bash" => Some(FileType::Shell),
            _ => None,
        }
    }

    /// Resolve a rule's `file_types` entry, which may be a tag (`py`)
    /// or a long name (`python`).
    pub fn from_tag_or_name(value: &str) -> Option<FileType> {
        let value = value.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|ft| ft.tag() == value || ft.name() == value)
    }

    /// Returns all file extensions associated with this type.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Python => &["py", "pyi"],
            FileType::JavaScript => &["js", "jsx", "mjs", "cjs"],
            FileType::TypeScript => &["ts", "tsx", "mts", "cts"],
            FileType::Rust => &["rs"],
            FileType::Go => &["go"],
            FileType::Java => &["java"],
            FileType::Yaml => &["yaml", "yml"],
            FileType::Json => &["json"],
            FileType::Toml => &["toml"],
            FileType::Markdown => &["md", "markdown"],
            FileType::Shell => &["sh", "bash"],
        }
    }

    /// Short tag used in rule files and reports.
    pub fn tag(&self) -> &'static str {
        match self {
            FileType::Python => "py",
            FileType::JavaScript => "js",
            FileType::TypeScript => "ts",
            FileType::Rust => "rs",
            FileType::Go => "go",
            FileType::Java => "java",
            FileType::Yaml => "yaml",
            FileType::Json => "json",
            FileType::Toml => "toml",
            FileType::Markdown => "md",
            FileType::Shell => "sh",
        }
    }

    /// Long name, also accepted in rule files.
    pub fn name(&self) -> &'static str {
        match self {
            FileType::Python => "python",
            FileType::JavaScript => "javascript",
            FileType::TypeScript => "typescript",
            FileType::Rust => "rust",
            FileType::Go => "go",
            FileType::Java => "java",
            FileType::Yaml => "yaml",
            FileType::Json => "json",
            FileType::Toml => "toml",
            FileType::Markdown => "markdown",
            FileType::Shell => "shell",
        }
    }

    pub fn all() -> &'static [FileType] {
        &[
            FileType::Python,
            FileType::JavaScript,
            FileType::TypeScript,
            FileType::Rust,
            FileType::Go,
            FileType::Java,
            FileType::Yaml,
            FileType::Json,
            FileType::Toml,
            FileType::Markdown,
            FileType::Shell,
        ]
    }

    /// The tree-sitter grammar for this file type, if it has one.
    /// `.tsx` files get the TSX dialect.
    pub fn ts_language(&self, ext: Option<&str>) -> Option<tree_sitter::Language> {
        match self {
            FileType::Python => Some(tree_sitter_python::LANGUAGE.into()),
            FileType::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            FileType::TypeScript => {
                if ext.is_some_and(|e| e.eq_ignore_ascii_case("tsx")) {
                    Some(tree_sitter_typescript::LANGUAGE_TSX.into())
                } else {
                    Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
                }
            }
            FileType::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            FileType::Go => Some(tree_sitter_go::LANGUAGE.into()),
            FileType::Java => Some(tree_sitter_java::LANGUAGE.into()),
            FileType::Yaml
            | FileType::Json
            | FileType::Toml
            | FileType::Markdown
            | FileType::Shell => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Classify a path by its extension. `None` means unknown.
pub fn classify(path: &Path) -> Option<FileType> {
    FileType::from_extension(path.extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_round_trip_through_classifier() {
        for ft in FileType::all() {
            for ext in ft.extensions() {
                let path = format!("dir/file.{ext}");
                assert_eq!(classify(Path::new(&path)), Some(*ft), "{path}");
            }
        }
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(classify(Path::new("Main.PY")), Some(FileType::Python));
        assert_eq!(classify(Path::new("app.TsX")), Some(FileType::TypeScript));
    }

    #[test]
    fn unknown_and_missing_extensions() {
        assert_eq!(classify(Path::new("Makefile")), None);
        assert_eq!(classify(Path::new("image.png")), None);
        assert_eq!(classify(Path::new(".gitignore")), None);
    }

    #[test]
    fn tags_and_names_resolve() {
        assert_eq!(FileType::from_tag_or_name("py"), Some(FileType::Python));
        assert_eq!(FileType::from_tag_or_name("Python"), Some(FileType::Python));
        assert_eq!(FileType::from_tag_or_name("shell"), Some(FileType::Shell));
        assert_eq!(FileType::from_tag_or_name("cobol"), None);
    }
}
