//! Request state published by a controller

use std::fmt;
use std::sync::Arc;

/// Where a request currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been requested yet
    Idle,
    /// A transport call is in flight
    Loading,
    /// Data is available, from the network or the cache
    Success,
    /// The last transport call failed
    Failure,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Success => "success",
            Phase::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Snapshot of a request: data, error and loading flag
///
/// At most one of `data` and `error` is set. While `loading` is true both are
/// cleared. The error is kept exactly as the transport returned it, behind an
/// `Arc` so snapshots stay cheap to clone.
#[derive(Debug)]
pub struct RequestState<T, E> {
    pub data: Option<T>,
    pub error: Option<Arc<E>>,
    pub loading: bool,
}

impl<T, E> RequestState<T, E> {
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            data: None,
            error: None,
            loading: true,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            loading: false,
        }
    }

    pub fn failure(error: E) -> Self {
        Self {
            data: None,
            error: Some(Arc::new(error)),
            loading: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failure
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_deref()
    }
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        Self::idle()
    }
}

// Derive would require `E: Clone`; the error sits behind an Arc.
impl<T: Clone, E> Clone for RequestState<T, E> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = RequestState<u32, String>;

    #[test]
    fn test_phase_for_each_constructor() {
        assert_eq!(State::idle().phase(), Phase::Idle);
        assert_eq!(State::loading().phase(), Phase::Loading);
        assert_eq!(State::success(7).phase(), Phase::Success);
        assert_eq!(State::failure("boom".to_string()).phase(), Phase::Failure);
    }

    #[test]
    fn test_loading_clears_result_fields() {
        let state = State::loading();
        assert!(state.is_loading());
        assert!(state.data().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_failure_keeps_error_verbatim() {
        let state = State::failure("connection refused".to_string());
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert_eq!(state.error().map(String::as_str), Some("connection refused"));
    }

    #[test]
    fn test_clone_shares_error() {
        let state = State::failure("boom".to_string());
        let copy = state.clone();
        let (a, b) = (state.error.unwrap(), copy.error.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Loading.to_string(), "loading");
        assert_eq!(Phase::Failure.to_string(), "failure");
    }
}
