//! Lifecycle of a value fetched from a remote source.
//!
//! ```text
//! None ──→ Loading ──→ Some ──→ SomeLoading ──→ Some
//!   ↑         │                      │
//!   │         ↓                      ↓
//!   └────── Error              SomeError ──→ SomeLoading
//! ```
//!
//! A `Some*` variant always carries the most recent successful value; a
//! failed revalidation records the error next to it instead of dropping it.

/// Tagged lifecycle wrapper around a value of type `T` with error type `E`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteValue<T, E> {
    /// Never fetched.
    None,
    /// First fetch in flight.
    Loading,
    /// Fetch succeeded.
    Some(T),
    /// First fetch failed.
    Error(E),
    /// Revalidating; previous value retained.
    SomeLoading(T),
    /// Revalidation failed; previous value retained.
    SomeError(T, E),
}

impl<T, E> RemoteValue<T, E> {
    /// Transforms the held value, keeping the lifecycle stage.
    pub fn map<U, F>(self, f: F) -> RemoteValue<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            RemoteValue::None => RemoteValue::None,
            RemoteValue::Loading => RemoteValue::Loading,
            RemoteValue::Some(value) => RemoteValue::Some(f(value)),
            RemoteValue::Error(err) => RemoteValue::Error(err),
            RemoteValue::SomeLoading(value) => RemoteValue::SomeLoading(f(value)),
            RemoteValue::SomeError(value, err) => RemoteValue::SomeError(f(value), err),
        }
    }

    /// Transforms the held error, keeping the lifecycle stage.
    pub fn map_err<G, F>(self, f: F) -> RemoteValue<T, G>
    where
        F: FnOnce(E) -> G,
    {
        match self {
            RemoteValue::None => RemoteValue::None,
            RemoteValue::Loading => RemoteValue::Loading,
            RemoteValue::Some(value) => RemoteValue::Some(value),
            RemoteValue::Error(err) => RemoteValue::Error(f(err)),
            RemoteValue::SomeLoading(value) => RemoteValue::SomeLoading(value),
            RemoteValue::SomeError(value, err) => RemoteValue::SomeError(value, f(err)),
        }
    }

    /// Collapses the value into `R` with one handler per variant.
    ///
    /// There is no catch-all: callers rendering a remote value must say what
    /// they show while loading and after a failure.
    #[allow(clippy::too_many_arguments)]
    pub fn fold<R>(
        self,
        on_none: impl FnOnce() -> R,
        on_loading: impl FnOnce() -> R,
        on_some: impl FnOnce(T) -> R,
        on_error: impl FnOnce(E) -> R,
        on_some_loading: impl FnOnce(T) -> R,
        on_some_error: impl FnOnce(T, E) -> R,
    ) -> R {
        match self {
            RemoteValue::None => on_none(),
            RemoteValue::Loading => on_loading(),
            RemoteValue::Some(value) => on_some(value),
            RemoteValue::Error(err) => on_error(err),
            RemoteValue::SomeLoading(value) => on_some_loading(value),
            RemoteValue::SomeError(value, err) => on_some_error(value, err),
        }
    }

    pub fn as_ref(&self) -> RemoteValue<&T, &E> {
        match self {
            RemoteValue::None => RemoteValue::None,
            RemoteValue::Loading => RemoteValue::Loading,
            RemoteValue::Some(value) => RemoteValue::Some(value),
            RemoteValue::Error(err) => RemoteValue::Error(err),
            RemoteValue::SomeLoading(value) => RemoteValue::SomeLoading(value),
            RemoteValue::SomeError(value, err) => RemoteValue::SomeError(value, err),
        }
    }

    /// The held value for any `Some*` variant.
    pub fn to_option(self) -> Option<T> {
        match self {
            RemoteValue::Some(value)
            | RemoteValue::SomeLoading(value)
            | RemoteValue::SomeError(value, _) => Some(value),
            RemoteValue::None | RemoteValue::Loading | RemoteValue::Error(_) => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.as_ref().to_option()
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            RemoteValue::Error(err) | RemoteValue::SomeError(_, err) => Some(err),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RemoteValue::None)
    }

    pub fn is_some(&self) -> bool {
        matches!(
            self,
            RemoteValue::Some(_) | RemoteValue::SomeLoading(_) | RemoteValue::SomeError(..)
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RemoteValue::Loading | RemoteValue::SomeLoading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RemoteValue::Error(_) | RemoteValue::SomeError(..))
    }

    /// Short name of the variant, used in logs and transition errors.
    pub fn stage(&self) -> &'static str {
        match self {
            RemoteValue::None => "none",
            RemoteValue::Loading => "loading",
            RemoteValue::Some(_) => "some",
            RemoteValue::Error(_) => "error",
            RemoteValue::SomeLoading(_) => "some_loading",
            RemoteValue::SomeError(..) => "some_error",
        }
    }

    /// Starts a fetch: `None|Error → Loading`, `Some|SomeError → SomeLoading`.
    ///
    /// A value already loading is returned unchanged.
    pub fn begin_fetch(self) -> Self {
        match self {
            RemoteValue::None | RemoteValue::Error(_) | RemoteValue::Loading => {
                RemoteValue::Loading
            }
            RemoteValue::Some(value)
            | RemoteValue::SomeLoading(value)
            | RemoteValue::SomeError(value, _) => RemoteValue::SomeLoading(value),
        }
    }

    /// Settles an in-flight fetch with a success.
    ///
    /// Returns the unchanged value back in `Err` when no fetch is in flight.
    pub fn succeed(self, value: T) -> Result<Self, Self> {
        match self {
            RemoteValue::Loading | RemoteValue::SomeLoading(_) => Ok(RemoteValue::Some(value)),
            other => Err(other),
        }
    }

    /// Settles an in-flight fetch with a failure, keeping any previous value.
    ///
    /// Returns the unchanged value back in `Err` when no fetch is in flight.
    pub fn fail(self, err: E) -> Result<Self, Self> {
        match self {
            RemoteValue::Loading => Ok(RemoteValue::Error(err)),
            RemoteValue::SomeLoading(value) => Ok(RemoteValue::SomeError(value, err)),
            other => Err(other),
        }
    }
}

impl<T, E> Default for RemoteValue<T, E> {
    fn default() -> Self {
        RemoteValue::None
    }
}

impl<T, E> From<Option<T>> for RemoteValue<T, E> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => RemoteValue::Some(value),
            None => RemoteValue::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Rv = RemoteValue<u32, String>;

    fn all_variants() -> Vec<Rv> {
        vec![
            RemoteValue::None,
            RemoteValue::Loading,
            RemoteValue::Some(1),
            RemoteValue::Error("e".to_string()),
            RemoteValue::SomeLoading(2),
            RemoteValue::SomeError(3, "e".to_string()),
        ]
    }

    #[test]
    fn map_preserves_stage() {
        for value in all_variants() {
            let stage = value.stage();
            let mapped = value.map(|v| v * 10);
            assert_eq!(mapped.stage(), stage);
        }
        assert_eq!(
            Rv::SomeLoading(2).map(|v| v + 1),
            RemoteValue::SomeLoading(3)
        );
    }

    #[test]
    fn fold_dispatches_each_variant() {
        let names: Vec<String> = all_variants()
            .into_iter()
            .map(|value| {
                value.fold(
                    || "none".to_string(),
                    || "loading".to_string(),
                    |v| format!("some {v}"),
                    |e| format!("error {e}"),
                    |v| format!("some_loading {v}"),
                    |v, e| format!("some_error {v} {e}"),
                )
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "none",
                "loading",
                "some 1",
                "error e",
                "some_loading 2",
                "some_error 3 e"
            ]
        );
    }

    #[test]
    fn to_option_only_for_some_variants() {
        let options: Vec<Option<u32>> = all_variants().into_iter().map(Rv::to_option).collect();
        assert_eq!(options, vec![None, None, Some(1), None, Some(2), Some(3)]);
    }

    #[test]
    fn predicates() {
        assert!(Rv::SomeLoading(1).is_some());
        assert!(Rv::SomeLoading(1).is_loading());
        assert!(!Rv::SomeLoading(1).is_error());
        assert!(Rv::SomeError(1, "e".into()).is_error());
        assert!(Rv::SomeError(1, "e".into()).is_some());
        assert!(!Rv::Error("e".into()).is_some());
        assert!(Rv::Loading.is_loading());
        assert!(Rv::None.is_none());
    }

    #[test]
    fn begin_fetch_transitions() {
        assert_eq!(Rv::None.begin_fetch(), RemoteValue::Loading);
        assert_eq!(Rv::Error("e".into()).begin_fetch(), RemoteValue::Loading);
        assert_eq!(Rv::Some(4).begin_fetch(), RemoteValue::SomeLoading(4));
        assert_eq!(
            Rv::SomeError(4, "e".into()).begin_fetch(),
            RemoteValue::SomeLoading(4)
        );
        assert_eq!(Rv::Loading.begin_fetch(), RemoteValue::Loading);
        assert_eq!(Rv::SomeLoading(4).begin_fetch(), RemoteValue::SomeLoading(4));
    }

    #[test]
    fn failed_revalidation_keeps_value() {
        let value = Rv::Some(7).begin_fetch().fail("boom".into()).unwrap();
        assert_eq!(value, RemoteValue::SomeError(7, "boom".to_string()));
    }

    #[test]
    fn settle_without_fetch_is_rejected() {
        assert_eq!(Rv::None.succeed(1), Err(RemoteValue::None));
        assert_eq!(Rv::Some(1).fail("e".into()), Err(RemoteValue::Some(1)));
    }
}
