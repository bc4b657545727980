//! Validators - pure checks returning either nothing or a map of violations.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Field name to violation description.
pub type ValidationErrors = BTreeMap<String, String>;

/// Returns `None` when the value is valid.
pub type Validator<T> = Arc<dyn Fn(&T) -> Option<ValidationErrors> + Send + Sync>;

/// Wraps a closure as a [`Validator`].
pub fn validator<T, F>(check: F) -> Validator<T>
where
    T: ?Sized,
    F: Fn(&T) -> Option<ValidationErrors> + Send + Sync + 'static,
{
    Arc::new(check)
}

/// A validator that accepts everything.
pub fn always_valid<T: ?Sized + 'static>() -> Validator<T> {
    Arc::new(|_: &T| -> Option<ValidationErrors> { None })
}

/// Combines `validators` into one that applies them all in order.
///
/// The result is the union of every reported violation, or `None` when none
/// report one. On a key reported twice the later validator's description
/// wins. An empty violation map counts as valid.
pub fn combine<T: ?Sized + 'static>(validators: Vec<Validator<T>>) -> Validator<T> {
    Arc::new(move |value: &T| {
        validators.iter().fold(None, |combined, next| {
            match next(value).filter(|errors| !errors.is_empty()) {
                Some(errors) => Some(match combined {
                    Some(mut combined) => {
                        combined.extend(errors);
                        combined
                    }
                    None => errors,
                }),
                None => combined,
            }
        })
    })
}

/// Builds a single-entry [`ValidationErrors`].
pub fn violation(field: impl Into<String>, reason: impl Into<String>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert(field.into(), reason.into());
    errors
}
