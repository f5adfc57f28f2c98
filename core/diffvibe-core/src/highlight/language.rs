//! Language detection from a file path's extension.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
    Html,
    Css,
    Scss,
    Svelte,
    Vue,
    Json,
    Yaml,
    Toml,
    Rust,
    Python,
    Go,
    C,
    Cpp,
    CSharp,
    Java,
    Shell,
    Bash,
    Markdown,
    PlainText,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Jsx => "jsx",
            Language::Html => "html",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Svelte => "svelte",
            Language::Vue => "vue",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Rust => "rust",
            Language::Python => "python",
            Language::Go => "go",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Shell => "shell",
            Language::Bash => "bash",
            Language::Markdown => "markdown",
            Language::PlainText => "plaintext",
        }
    }

    /// Extensions a grammar lookup should try, closest grammar first.
    /// Dialects fall back to their base language.
    pub fn grammar_extensions(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["js"],
            Language::TypeScript => &["ts", "js"],
            Language::Tsx => &["tsx", "ts", "js"],
            Language::Jsx => &["jsx", "js"],
            Language::Html => &["html"],
            Language::Css => &["css"],
            Language::Scss => &["scss", "css"],
            Language::Svelte => &["svelte", "html"],
            Language::Vue => &["vue", "html"],
            Language::Json => &["json"],
            Language::Yaml => &["yaml", "yml"],
            Language::Toml => &["toml"],
            Language::Rust => &["rs"],
            Language::Python => &["py"],
            Language::Go => &["go"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc"],
            Language::CSharp => &["cs"],
            Language::Java => &["java"],
            Language::Shell => &["sh"],
            Language::Bash => &["bash", "sh"],
            Language::Markdown => &["md"],
            Language::PlainText => &[],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a file path hint to a language. Unknown extensions are plain text.
///
/// The extension is whatever follows the last `.`, so a bare extension
/// (`"rs"`) is accepted as a hint too.
pub fn detect_language(path_hint: &str) -> Language {
    let ext = path_hint
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "js" | "mjs" | "cjs" => Language::JavaScript,
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,

        "html" | "htm" => Language::Html,
        "css" => Language::Css,
        "scss" | "sass" => Language::Scss,
        "svelte" => Language::Svelte,
        "vue" => Language::Vue,

        "json" => Language::Json,
        "yaml" | "yml" => Language::Yaml,
        "toml" => Language::Toml,

        "rs" => Language::Rust,
        "py" | "pyw" => Language::Python,
        "go" => Language::Go,

        "c" | "h" => Language::C,
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" => Language::Cpp,
        "cs" => Language::CSharp,
        "java" => Language::Java,

        "sh" => Language::Shell,
        "bash" | "zsh" => Language::Bash,

        "md" | "markdown" => Language::Markdown,

        _ => Language::PlainText,
    }
}
