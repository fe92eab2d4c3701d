//! User-friendly diagnostic messages.
//!
//! Every error shown to the user carries the root cause, the facts needed to
//! understand it (available targets, configurations, candidate projects),
//! and a suggested fix.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no project is found.
    pub const NO_PROJECT: &str =
        "Pass `--xcodeproj-path <path>` or set PROJECT_PATH to the .xcodeproj to modify";

    /// Suggestion when several projects are candidates.
    pub const AMBIGUOUS_PROJECT: &str =
        "Pass `--xcodeproj-path <path>` to pick one of the projects";

    /// Suggestion when a target is not found.
    pub const TARGET_NOT_FOUND: &str = "Run `cosigner targets` to see available targets";

    /// Suggestion when a configuration is not found.
    pub const CONFIGURATION_NOT_FOUND: &str =
        "Run `cosigner targets` to see the configurations of each target";

    /// Suggestion when the project cannot be parsed.
    pub const MALFORMED_PROJECT: &str =
        "Open the project in Xcode to repair it, or restore it from version control";

    /// Suggestion when the platform is not supported.
    pub const UNSUPPORTED_PLATFORM: &str = "Only run cosigner from `ios` or `mac` lanes";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let error_prefix = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };
        output.push_str(&format!("{}: {}\n", error_prefix, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
