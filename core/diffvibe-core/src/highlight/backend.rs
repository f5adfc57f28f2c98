//! Default tokenizer backed by syntect's bundled grammars and themes.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::{Language, Tokenizer};
use crate::error::{DiffVibeError, Result};

const FALLBACK_THEME: &str = "base16-ocean.dark";

pub struct SyntectTokenizer {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl SyntectTokenizer {
    /// Loads the bundled grammar and theme sets. Takes tens of milliseconds,
    /// so [`Highlighter`](super::Highlighter) defers it to first use.
    pub fn load() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_nonewlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    fn syntax_for(&self, language: Language) -> Option<&SyntaxReference> {
        language
            .grammar_extensions()
            .iter()
            .find_map(|ext| self.syntaxes.find_syntax_by_extension(ext))
            .or_else(|| self.syntaxes.find_syntax_by_token(language.as_str()))
    }

    fn theme_for(&self, name: &str) -> Option<&Theme> {
        let resolved = match name {
            "github-dark" => "base16-ocean.dark",
            "github-light" => "InspiredGitHub",
            other => other,
        };
        self.themes
            .themes
            .get(resolved)
            .or_else(|| self.themes.themes.get(FALLBACK_THEME))
            .or_else(|| self.themes.themes.values().next())
    }
}

impl Tokenizer for SyntectTokenizer {
    fn highlight(&self, lines: &[String], language: Language, theme: &str) -> Result<Vec<String>> {
        let tokenize_error = |details: String| DiffVibeError::Tokenize {
            language: language.to_string(),
            details,
        };

        let syntax = self
            .syntax_for(language)
            .ok_or_else(|| tokenize_error("no bundled grammar".to_string()))?;
        let theme = self
            .theme_for(theme)
            .ok_or_else(|| tokenize_error("no themes available".to_string()))?;

        // One highlighter across all lines keeps parse state for multi-line constructs
        let mut highlighter = HighlightLines::new(syntax, theme);
        lines
            .iter()
            .map(|line| {
                let ranges = highlighter
                    .highlight_line(line, &self.syntaxes)
                    .map_err(|e| tokenize_error(e.to_string()))?;
                styled_line_to_highlighted_html(&ranges, IncludeBackground::No)
                    .map_err(|e| tokenize_error(e.to_string()))
            })
            .collect()
    }
}
