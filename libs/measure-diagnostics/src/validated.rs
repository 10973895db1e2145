//! Validated results
//!
//! [`Validated<T>`] pairs a resolver's result with the diagnostics produced
//! while computing it. A failed resolution of an optional target is a
//! `Validated<Option<T>>` holding `None` — the diagnostics still travel with
//! it, nothing is thrown.

use crate::Diagnostic;

/// A value together with the diagnostics produced while computing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Validated<T> {
    /// A clean result with no findings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Append another validated value's diagnostics to this one, returning
    /// the other value.
    pub fn absorb<U>(&mut self, other: Validated<U>) -> U {
        self.diagnostics.extend(other.diagnostics);
        other.value
    }

    /// Drain the diagnostics into an external sink and return the bare value.
    pub fn drain_into(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.diagnostics);
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl<T> Validated<Option<T>> {
    /// An empty result: the declaration could not be resolved at all, and
    /// only the diagnostics remain.
    pub fn empty(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: None,
            diagnostics,
        }
    }
}

impl<T> From<T> for Validated<T> {
    fn from(value: T) -> Self {
        Self::ok(value)
    }
}
