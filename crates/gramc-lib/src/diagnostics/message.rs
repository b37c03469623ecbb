use rowan::TextRange;

/// Diagnostic kinds, grouped by the stage that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Command-line configuration
    OutputDirIsFile,
    DirNotFound,

    // Per-file I/O
    CannotOpenFile,
    CannotWriteFile,
    CannotWriteGeneratedLexer,
    CannotGenDotFile,

    // Grammar content
    GrammarError,
    GrammarWarning,

    // Failures of the tool itself
    InternalError,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::GrammarWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::OutputDirIsFile => "output directory is a file",
            Self::DirNotFound => "directory not found",

            Self::CannotOpenFile => "cannot find or open file",
            Self::CannotWriteFile => "cannot write file",
            Self::CannotWriteGeneratedLexer => "cannot write implicitly generated lexer grammar",
            Self::CannotGenDotFile => "cannot write DOT file",

            Self::GrammarError => "grammar error",
            Self::GrammarWarning => "grammar warning",

            Self::InternalError => "internal error",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            // Grammar problems carry their own complete wording
            Self::GrammarError | Self::GrammarWarning => "{}".to_string(),

            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Grammar file the diagnostic points into, if any.
    pub(crate) file: Option<String>,
    /// The range shown to the user (underlined in output). Needs `file`.
    pub(crate) range: Option<TextRange>,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind) -> Self {
        Self {
            kind,
            file: None,
            range: None,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.severity())?;
        match (&self.file, self.range) {
            (Some(file), Some(range)) => write!(
                f,
                " at {}:{}..{}",
                file,
                u32::from(range.start()),
                u32::from(range.end())
            )?,
            (Some(file), None) => write!(f, " in {}", file)?,
            _ => {}
        }
        write!(f, ": {}", self.message)?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
