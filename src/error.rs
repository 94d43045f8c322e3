//! Error handling for document construction, mutation and translation
use std::path::PathBuf;

/// A result type for document operations, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// Returns early with an [`XmlError`] built from the given kind.
///
/// An optional leading tag path is recorded in the error context.
macro_rules! bail {
    (at = $tag:expr, $kind:expr) => {{
        let context = $crate::error::ErrorContext::at_tag($tag);
        return Err($crate::error::XmlError::new($kind, context));
    }};

    ($kind:expr) => {
        return Err($crate::error::XmlError::from($kind))
    };
}
pub(crate) use bail;

/// An error that occurred while building, changing or writing a document.
#[derive(Debug)]
pub struct XmlError {
    /// The context of the error
    pub context: Box<ErrorContext>,

    /// The kind of error that occurred
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError`
    #[must_use]
    pub fn new(kind: XmlErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Adds a file path to the error context.
    #[must_use]
    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.context.file = Some(path);
        self
    }

    /// Adds the path of the tag being operated on to the error context.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.context.tag = Some(tag.into());
        self
    }

    /// Returns the kind of error that occurred.
    #[must_use]
    pub fn kind(&self) -> &XmlErrorKind {
        &self.kind
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
impl From<XmlErrorKind> for XmlError {
    fn from(kind: XmlErrorKind) -> Self {
        Self::new(kind, ErrorContext::default())
    }
}
impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Self::from(XmlErrorKind::Io(err))
    }
}

/// The kind of error that occurred while working with a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// A tag or attribute name does not follow the XML naming rules
    #[error("Invalid name `{0}`: names can only contain letters, numbers, hyphens, underscores and periods, and cannot start with `xml`")]
    InvalidName(String),

    /// A tag would hold both a value and child tags
    #[error("A tag cannot simultaneously have a value and other tags: {0}")]
    ValueConflict(String),

    /// An object could not be translated into tags
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// IO error occurred while writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Context describing where in the document, or on disk, the error happened.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Path of the tag being operated on, if any, such as `/plano/fuc`.
    pub tag: Option<String>,

    /// The file being written, if any.
    pub file: Option<PathBuf>,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` pointing at the given tag path.
    #[must_use]
    pub fn at_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            file: None,
        }
    }

    /// Creates a new `ErrorContext` pointing at the given file.
    #[must_use]
    pub fn in_file(file: PathBuf) -> Self {
        Self {
            tag: None,
            file: Some(file),
        }
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(tag) = &self.tag {
            writeln!(f, "| {tag}")?;
        }

        if let Some(file) = &self.file {
            writeln!(f, "= In {}", file.display())?;
        }
        Ok(())
    }
}
