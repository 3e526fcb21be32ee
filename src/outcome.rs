//! Outcomes - what happened to a repository operation, as a tagged value.

/// Tagged outcome of a repository operation.
///
/// An operation either ran against the store (`Completed`, carrying its
/// result envelope), had nothing to act on (`NotApplicable`), or was never
/// attempted because a required input could not be resolved
/// (`PreconditionFailed`).
///
/// Storage faults are not an outcome variant: a faulted call still
/// completes, with the fault text captured inside the envelope's error
/// field.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<R> {
    /// The operation ran; the envelope holds what came back.
    Completed(R),
    /// Nothing to do: an empty batch, a missing filter, an exhausted scan.
    NotApplicable,
    /// A required input was missing or malformed; the store was never called.
    PreconditionFailed(String),
}

impl<R> Outcome<R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Outcome::NotApplicable)
    }

    /// The completed envelope, if there is one.
    pub fn completed(self) -> Option<R> {
        match self {
            Outcome::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_completed(&self) -> Option<&R> {
        match self {
            Outcome::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// The precondition failure reason, if the operation was refused.
    pub fn precondition_failure(&self) -> Option<&str> {
        match self {
            Outcome::PreconditionFailed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Maps the completed envelope, leaving the other variants untouched.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(result) => Outcome::Completed(f(result)),
            Outcome::NotApplicable => Outcome::NotApplicable,
            Outcome::PreconditionFailed(reason) => Outcome::PreconditionFailed(reason),
        }
    }
}
