use std::fmt;

/// A value that is either what was asked for, or a substitute picked because
/// the real value was unavailable. Callers decide whether to surface the
/// staleness or trust the substitute.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Exact(T),
    Fallback { value: T, reason: String },
}

impl<T> Resolved<T> {
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Resolved::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Resolved::Exact(value) | Resolved::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolved::Exact(value) | Resolved::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolved::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Resolved::Exact(_) => None,
            Resolved::Fallback { reason, .. } => Some(reason),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}
