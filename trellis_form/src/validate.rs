// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation boundary.
//!
//! Controls run a list of [`Validator`]s against their model value. Each
//! validator declares its severity through an explicit [`ValidatorKind`] tag
//! rather than being sniffed from its type, so a control never misclassifies
//! a third-party validator. Feedback text lives behind [`MessageSource`] so
//! the core stays free of any particular localization scheme.

use alloc::string::String;
use alloc::vec::Vec;

/// Severity tag a validator declares for itself.
///
/// Ordered from most to least severe; [`ValidationState`] reports the worst
/// kind among failing validators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidatorKind {
    /// The value is invalid and blocks submission.
    Error,
    /// The value is acceptable but suspicious.
    Warning,
    /// Neutral guidance.
    Info,
    /// Positive confirmation shown when the validator matches.
    Success,
}

/// A single validation rule over model values.
pub trait Validator<V> {
    /// Stable identifier, used as the message lookup key.
    fn name(&self) -> &str;

    /// Declared severity. Defaults to [`ValidatorKind::Error`].
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Error
    }

    /// Whether the validator *fires* for this value (reports feedback).
    ///
    /// An unset value (`None`) fires required-style validators and passes
    /// everything else; validators that care distinguish the two themselves.
    fn fires(&self, value: Option<&V>) -> bool;
}

/// Source of user-facing feedback text, keyed by validator name and kind.
pub trait MessageSource {
    /// Message for a fired validator, or `None` to fall back to the name.
    fn message(&self, validator_name: &str, kind: ValidatorKind) -> Option<String>;
}

/// One fired validator's feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    /// Name of the validator that fired.
    pub validator: String,
    /// Its declared severity.
    pub kind: ValidatorKind,
    /// Resolved message text.
    pub message: String,
}

/// Result of running a validator list against a value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationState {
    /// Feedback from fired validators, most severe kind first, list order
    /// within a kind.
    pub feedback: Vec<Feedback>,
}

impl ValidationState {
    /// Whether any error-kind validator fired.
    pub fn has_errors(&self) -> bool {
        self.feedback.iter().any(|f| f.kind == ValidatorKind::Error)
    }

    /// The most severe kind among fired validators.
    pub fn worst(&self) -> Option<ValidatorKind> {
        self.feedback.first().map(|f| f.kind)
    }
}

/// Run `validators` against `value`, resolving messages through `messages`.
pub fn evaluate<V>(
    value: Option<&V>,
    validators: &[&dyn Validator<V>],
    messages: &dyn MessageSource,
) -> ValidationState {
    let mut feedback: Vec<Feedback> = validators
        .iter()
        .filter(|v| v.fires(value))
        .map(|v| Feedback {
            validator: String::from(v.name()),
            kind: v.kind(),
            message: messages
                .message(v.name(), v.kind())
                .unwrap_or_else(|| String::from(v.name())),
        })
        .collect();
    // Stable by construction, so same-kind feedback keeps list order.
    feedback.sort_by_key(|f| f.kind);
    ValidationState { feedback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    struct Required;
    impl Validator<i32> for Required {
        fn name(&self) -> &str {
            "required"
        }
        fn fires(&self, value: Option<&i32>) -> bool {
            value.is_none()
        }
    }

    struct SuspiciouslyLarge;
    impl Validator<i32> for SuspiciouslyLarge {
        fn name(&self) -> &str {
            "suspiciously-large"
        }
        fn kind(&self) -> ValidatorKind {
            ValidatorKind::Warning
        }
        fn fires(&self, value: Option<&i32>) -> bool {
            value.is_some_and(|v| *v > 1000)
        }
    }

    struct NoMessages;
    impl MessageSource for NoMessages {
        fn message(&self, _: &str, _: ValidatorKind) -> Option<String> {
            None
        }
    }

    struct StaticMessages;
    impl MessageSource for StaticMessages {
        fn message(&self, name: &str, _: ValidatorKind) -> Option<String> {
            (name == "required").then(|| "Please fill this in".to_string())
        }
    }

    #[test]
    fn severity_comes_from_the_declared_tag() {
        let validators: [&dyn Validator<i32>; 2] = [&SuspiciouslyLarge, &Required];
        let state = evaluate(None, &validators, &NoMessages);
        // Only `required` fires on an unset value, and it is an error even
        // though a warning validator was listed first.
        assert_eq!(state.worst(), Some(ValidatorKind::Error));
        assert!(state.has_errors());

        let state = evaluate(Some(&5000), &validators, &NoMessages);
        assert_eq!(state.worst(), Some(ValidatorKind::Warning));
        assert!(!state.has_errors());
    }

    #[test]
    fn messages_resolve_through_the_source_with_name_fallback() {
        let validators: [&dyn Validator<i32>; 1] = [&Required];
        let state = evaluate(None, &validators, &StaticMessages);
        assert_eq!(state.feedback[0].message, "Please fill this in");
        let state = evaluate(None, &validators, &NoMessages);
        assert_eq!(state.feedback[0].message, "required");
    }

    #[test]
    fn passing_value_yields_empty_state() {
        let validators: [&dyn Validator<i32>; 2] = [&Required, &SuspiciouslyLarge];
        let state = evaluate(Some(&3), &validators, &NoMessages);
        assert_eq!(state, ValidationState::default());
        assert_eq!(state.worst(), None);
    }
}
