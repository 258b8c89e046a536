use crate::error::TypesError;
use std::fmt;

/// Length-validated text field.
///
/// The limit is counted in characters, not bytes, and is enforced at
/// construction; a value that exists is always within bounds.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BoundedText<const MAX: usize>(String);

/// Proposal title, at most 100 characters.
pub type Title = BoundedText<100>;
/// Proposal description, at most 1000 characters.
pub type Description = BoundedText<1000>;
/// Optional supporting link, at most 255 characters.
pub type Link = BoundedText<255>;
/// Expected-impact summary, at most 500 characters.
pub type ImpactMetrics = BoundedText<500>;

impl<const MAX: usize> BoundedText<MAX> {
    /// Maximum length in characters.
    pub const MAX_CHARS: usize = MAX;

    /// Create a bounded text value, rejecting over-long input.
    pub fn new(text: impl Into<String>) -> Result<Self, TypesError> {
        let text = text.into();
        let chars = text.chars().count();
        if chars > MAX {
            return Err(TypesError::TextTooLong {
                max: MAX,
                actual: chars,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: usize> fmt::Debug for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedText<{}>({:?})", MAX, self.0)
    }
}

impl<const MAX: usize> TryFrom<&str> for BoundedText<MAX> {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<const MAX: usize> TryFrom<String> for BoundedText<MAX> {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<const MAX: usize> AsRef<str> for BoundedText<MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
