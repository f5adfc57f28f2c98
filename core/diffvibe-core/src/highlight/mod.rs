//! Syntax highlighting for diff panes.
//!
//! [`Highlighter::highlight_lines`] turns raw lines into one markup line per
//! input line. It never fails: unsupported languages, tokenizer setup errors and
//! tokenizer errors all degrade to HTML-escaped plain text.
//!
//! The tokenizer is created lazily on first use. Concurrent first callers block
//! on the same in-flight setup, so setup runs once per highlighter.

mod backend;
mod language;
mod requests;

pub use backend::SyntectTokenizer;
pub use language::{detect_language, Language};
pub use requests::{HighlightRequests, RequestTicket};

use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{DiffVibeError, Result};
use crate::preferences::DEFAULT_DARK_SYNTAX_THEME;

/// A tokenizer/theme engine producing per-line markup.
pub trait Tokenizer: Send + Sync {
    /// Highlights `lines` as one source text. Must return exactly one markup
    /// string per input line with all text content HTML-escaped.
    fn highlight(&self, lines: &[String], language: Language, theme: &str) -> Result<Vec<String>>;
}

type TokenizerInit = Box<dyn Fn() -> Result<Arc<dyn Tokenizer>> + Send + Sync>;

pub struct Highlighter {
    init: TokenizerInit,
    tokenizer: OnceCell<Arc<dyn Tokenizer>>,
    theme: RwLock<String>,
}

impl Highlighter {
    /// Creates a highlighter that builds its tokenizer with `init` on first use.
    /// A failed `init` is retried by the next call.
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Tokenizer>> + Send + Sync + 'static,
    {
        Self {
            init: Box::new(init),
            tokenizer: OnceCell::new(),
            theme: RwLock::new(DEFAULT_DARK_SYNTAX_THEME.to_string()),
        }
    }

    pub fn with_tokenizer<T: Tokenizer + 'static>(tokenizer: T) -> Self {
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(tokenizer);
        Self::new(move || Ok(tokenizer.clone()))
    }

    /// Highlighter using the bundled syntect grammars.
    pub fn syntect() -> Self {
        Self::new(|| {
            let tokenizer: Arc<dyn Tokenizer> = Arc::new(SyntectTokenizer::load());
            Ok(tokenizer)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.tokenizer.get().is_some()
    }

    pub fn tokenizer(&self) -> Result<&Arc<dyn Tokenizer>> {
        self.tokenizer.get_or_try_init(|| {
            debug!("Initializing syntax highlighter");
            (self.init)()
        })
    }

    pub fn set_theme(&self, theme: &str) {
        let mut current = self
            .theme
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = theme.to_string();
    }

    pub fn theme(&self) -> String {
        self.theme
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns one markup line per input line, inferring the language from `path_hint`.
    pub fn highlight_lines(&self, lines: &[String], path_hint: &str) -> Vec<String> {
        let language = detect_language(path_hint);
        if language == Language::PlainText {
            return escape_lines(lines);
        }

        let tokenizer = match self.tokenizer() {
            Ok(tokenizer) => tokenizer,
            Err(err) => {
                warn!(error = %err, "Syntax highlighter unavailable, rendering plain text");
                return escape_lines(lines);
            }
        };

        let theme = self.theme();
        match tokenizer.highlight(lines, language, &theme) {
            Ok(markup) if markup.len() == lines.len() => markup,
            Ok(markup) => {
                warn!(
                    %language,
                    expected = lines.len(),
                    actual = markup.len(),
                    "Tokenizer returned wrong line count, rendering plain text"
                );
                escape_lines(lines)
            }
            Err(err) => {
                warn!(%language, error = %err, "Failed to highlight code");
                escape_lines(lines)
            }
        }
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("initialized", &self.is_initialized())
            .field("theme", &self.theme())
            .finish()
    }
}

/// Escapes `& < > " '` for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn escape_lines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| escape_html(line)).collect()
}

/// Maps a failed setup into the crate error, for custom `init` closures.
pub fn init_error(details: impl Into<String>) -> DiffVibeError {
    DiffVibeError::HighlighterInit(details.into())
}


#[cfg(test)]
mod tests {
    use super::test_utils::EchoTokenizer;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    struct FailingTokenizer;

    impl Tokenizer for FailingTokenizer {
        fn highlight(&self, _: &[String], language: Language, _: &str) -> Result<Vec<String>> {
            Err(DiffVibeError::Tokenize {
                language: language.to_string(),
                details: "boom".to_string(),
            })
        }
    }

    struct ShortTokenizer;

    impl Tokenizer for ShortTokenizer {
        fn highlight(&self, _: &[String], _: Language, _: &str) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    fn lines(source: &[&str]) -> Vec<String> {
        source.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_plain_text_skips_tokenizer_setup() {
        let highlighter = Highlighter::with_tokenizer(EchoTokenizer);
        let output = highlighter.highlight_lines(&lines(&["a < b"]), "notes.txt");

        assert_eq!(output, vec!["a &lt; b".to_string()]);
        assert!(!highlighter.is_initialized());
    }

    #[test]
    fn test_uses_tokenizer_with_current_theme() {
        let highlighter = Highlighter::with_tokenizer(EchoTokenizer);
        highlighter.set_theme("nord");

        let output = highlighter.highlight_lines(&lines(&["let x;"]), "main.rs");
        assert_eq!(output, vec!["<span class=\"rust nord\">let x;</span>".to_string()]);
    }

    #[test]
    fn test_tokenizer_failure_falls_back_to_escaped_text() {
        let highlighter = Highlighter::with_tokenizer(FailingTokenizer);
        let output = highlighter.highlight_lines(&lines(&["<div>", "ok"]), "page.html");
        assert_eq!(output, lines(&["&lt;div&gt;", "ok"]));
    }

    #[test]
    fn test_line_count_mismatch_falls_back() {
        let highlighter = Highlighter::with_tokenizer(ShortTokenizer);
        let output = highlighter.highlight_lines(&lines(&["a", "b"]), "x.py");
        assert_eq!(output, lines(&["a", "b"]));
    }

    #[test]
    fn test_init_failure_falls_back_and_retries() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let highlighter = Highlighter::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(init_error("grammar bundle missing"))
            } else {
                let tokenizer: Arc<dyn Tokenizer> = Arc::new(EchoTokenizer);
                Ok(tokenizer)
            }
        });

        let first = highlighter.highlight_lines(&lines(&["x"]), "a.go");
        assert_eq!(first, lines(&["x"]));
        assert!(!highlighter.is_initialized());

        let second = highlighter.highlight_lines(&lines(&["x"]), "a.go");
        assert!(second[0].starts_with("<span"));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_use_initializes_once() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let highlighter = Arc::new(Highlighter::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            let tokenizer: Arc<dyn Tokenizer> = Arc::new(EchoTokenizer);
            Ok(tokenizer)
        }));

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let highlighter = highlighter.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    highlighter.highlight_lines(&["x".to_string()], "a.rs")
                })
            })
            .collect();

        for handle in handles {
            let output = handle.join().unwrap();
            assert!(output[0].starts_with("<span"));
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let highlighter = Highlighter::with_tokenizer(EchoTokenizer);
        assert!(highlighter.highlight_lines(&[], "main.rs").is_empty());
    }
}
