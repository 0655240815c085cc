//! Mock behaviors and their resolution.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mockingbird_core::ErrorValue;
use serde_json::Value;

/// Caller-supplied resolution function for [`MockBehavior::Custom`].
pub type Resolver = Arc<dyn Fn(&str, &[Value]) -> Result<Value, ErrorValue> + Send + Sync>;

/// How a mock resolves a call to one method.
#[derive(Clone)]
pub enum MockBehavior {
    /// Resolve immediately with a value.
    Success(Value),
    /// Resolve with the given error.
    Failure(ErrorValue),
    /// Wait, then resolve with the method's fallback success value.
    ///
    /// The fallback is the instance default when that is a `Success`, else
    /// the [`DefaultPolicy`](crate::DefaultPolicy) value. `Failure`,
    /// `Delayed` and `Custom` instance defaults are not consulted.
    Delayed(Duration),
    /// Resolve through a caller-supplied function.
    Custom(Resolver),
}

impl MockBehavior {
    /// A success resolving to `value`.
    pub fn success(value: impl Into<Value>) -> Self {
        MockBehavior::Success(value.into())
    }

    /// A failure resolving to `error`.
    pub fn failure(error: ErrorValue) -> Self {
        MockBehavior::Failure(error)
    }

    /// A delay expressed in seconds.
    pub fn delayed_secs(seconds: f64) -> Self {
        MockBehavior::Delayed(
            Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX),
        )
    }

    /// A custom resolver.
    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value, ErrorValue> + Send + Sync + 'static,
    {
        MockBehavior::Custom(Arc::new(resolver))
    }

    /// Short name of the behavior kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MockBehavior::Success(_) => "success",
            MockBehavior::Failure(_) => "failure",
            MockBehavior::Delayed(_) => "delayed",
            MockBehavior::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for MockBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockBehavior::Success(value) => f.debug_tuple("Success").field(value).finish(),
            MockBehavior::Failure(err) => f.debug_tuple("Failure").field(err).finish(),
            MockBehavior::Delayed(delay) => f.debug_tuple("Delayed").field(delay).finish(),
            MockBehavior::Custom(_) => f.write_str("Custom(<resolver>)"),
        }
    }
}

/// What a behavior resolves to before any suspension happens.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The outcome is known now.
    Ready(Result<Value, ErrorValue>),
    /// Suspend for `delay`, then resolve the fallback success value.
    Wait(Duration),
}

/// Maps a method call and its configured behavior to a [`Resolution`].
///
/// This performs no I/O and no suspension; custom resolvers are invoked
/// directly.
pub fn resolve_behavior(method: &str, args: &[Value], behavior: &MockBehavior) -> Resolution {
    match behavior {
        MockBehavior::Success(value) => Resolution::Ready(Ok(value.clone())),
        MockBehavior::Failure(err) => Resolution::Ready(Err(err.clone())),
        MockBehavior::Delayed(delay) => Resolution::Wait(*delay),
        MockBehavior::Custom(resolver) => Resolution::Ready(resolver(method, args)),
    }
}
