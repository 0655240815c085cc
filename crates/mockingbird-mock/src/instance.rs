//! Mock instances: per-method behaviors plus a call ledger.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use mockingbird_core::ErrorValue;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::behavior::{resolve_behavior, MockBehavior, Resolution};
use crate::error::{MockError, Result};
use crate::ledger::CallLedger;
use crate::policy::DefaultPolicy;
use crate::value::ValueKind;

/// Capability name given to instances created outside the registry cache.
pub const ANONYMOUS_CAPABILITY: &str = "<anonymous>";

/// Resolution step decided before any suspension.
enum Step {
    Done(Result<Value>),
    Sleep(Duration),
}

/// A mock standing in for one capability.
///
/// Behaviors can be changed through a shared reference, so an instance handed
/// out as `Arc<MockInstance>` can be configured by the test after the code
/// under test already holds it.
///
/// Resolution of a method call follows this chain:
///
/// 1. the behavior configured for the method
/// 2. the instance default behavior
/// 3. the [`DefaultPolicy`] value for the method name
///
/// If all three are absent the call fails with [`MockError::NotConfigured`].
/// The call is recorded in the ledger before resolution, whatever the result.
#[derive(Debug)]
pub struct MockInstance {
    id: Uuid,
    capability: String,
    behaviors: RwLock<HashMap<String, MockBehavior>>,
    default_behavior: RwLock<Option<MockBehavior>>,
    policy: DefaultPolicy,
    ledger: CallLedger,
}

impl MockInstance {
    /// Creates an instance with no configured behaviors.
    pub fn new(capability: impl Into<String>, policy: DefaultPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            capability: capability.into(),
            behaviors: RwLock::new(HashMap::new()),
            default_behavior: RwLock::new(None),
            policy,
            ledger: CallLedger::new(),
        }
    }

    /// Sets the behavior used by methods without their own behavior.
    pub fn with_default_behavior(self, behavior: MockBehavior) -> Self {
        self.set_default_behavior(Some(behavior));
        self
    }

    /// Pre-configures behaviors for several methods.
    pub fn with_behaviors(
        self,
        behaviors: impl IntoIterator<Item = (String, MockBehavior)>,
    ) -> Self {
        self.behaviors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(behaviors);
        self
    }

    /// Unique id of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the capability this instance stands in for.
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Policy supplying values for unconfigured methods.
    pub fn policy(&self) -> &DefaultPolicy {
        &self.policy
    }

    /// Read-only access to recorded calls.
    pub fn ledger(&self) -> &CallLedger {
        &self.ledger
    }

    /// Number of recorded calls to `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.ledger.call_count(method)
    }

    /// True when `method` was called at least once.
    pub fn was_called(&self, method: &str) -> bool {
        self.ledger.was_called(method)
    }

    /// Configures the behavior for one method, replacing any previous one.
    pub fn set_behavior(&self, method: impl Into<String>, behavior: MockBehavior) {
        let method = method.into();
        debug!(capability = %self.capability, method = %method, kind = behavior.kind(), "Configuring mock behavior");
        self.behaviors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method, behavior);
    }

    /// Makes `method` resolve to `value`.
    pub fn set_return_value(&self, method: impl Into<String>, value: impl Into<Value>) {
        self.set_behavior(method, MockBehavior::Success(value.into()));
    }

    /// Makes `method` fail with `error`.
    pub fn set_error(&self, method: impl Into<String>, error: ErrorValue) {
        self.set_behavior(method, MockBehavior::Failure(error));
    }

    /// Makes `method` wait for `delay`, then resolve its fallback value.
    pub fn set_delay(&self, method: impl Into<String>, delay: Duration) {
        self.set_behavior(method, MockBehavior::Delayed(delay));
    }

    /// Makes `method` resolve through `resolver`.
    pub fn set_custom<F>(&self, method: impl Into<String>, resolver: F)
    where
        F: Fn(&str, &[Value]) -> std::result::Result<Value, ErrorValue> + Send + Sync + 'static,
    {
        self.set_behavior(method, MockBehavior::custom(resolver));
    }

    /// Replaces the instance default behavior.
    pub fn set_default_behavior(&self, behavior: Option<MockBehavior>) {
        *self
            .default_behavior
            .write()
            .unwrap_or_else(PoisonError::into_inner) = behavior;
    }

    /// Removes the behavior configured for `method`. Returns true if one was set.
    pub fn clear_behavior(&self, method: &str) -> bool {
        self.behaviors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(method)
            .is_some()
    }

    /// Clears all per-method behaviors and the call ledger.
    pub fn reset(&self) {
        self.behaviors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.ledger.clear();
    }

    fn behavior_for(&self, method: &str) -> Option<MockBehavior> {
        let configured = self
            .behaviors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(method)
            .cloned();

        configured.or_else(|| {
            self.default_behavior
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    /// Value returned when no behavior applies, or after a delay completes.
    ///
    /// Only a `Success` instance default counts here; any other default
    /// falls through to the policy.
    fn fallback_value(&self, method: &str) -> Result<Value> {
        let instance_default = self
            .default_behavior
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(MockBehavior::Success(value)) = instance_default {
            return Ok(value);
        }

        self.policy
            .default_for(method)
            .ok_or_else(|| MockError::NotConfigured {
                capability: self.capability.clone(),
                method: method.to_string(),
            })
    }

    fn begin(&self, method: &str, args: &[Value]) -> Step {
        let sequence = self.ledger.record(method, args);

        let Some(behavior) = self.behavior_for(method) else {
            debug!(capability = %self.capability, method, sequence, "No behavior configured, using default policy");
            return Step::Done(self.fallback_value(method));
        };

        debug!(capability = %self.capability, method, sequence, kind = behavior.kind(), "Resolving mock call");

        match resolve_behavior(method, args, &behavior) {
            Resolution::Ready(outcome) => Step::Done(outcome.map_err(MockError::Failure)),
            Resolution::Wait(delay) => Step::Sleep(delay),
        }
    }

    /// Resolves a call, suspending the task for [`MockBehavior::Delayed`].
    ///
    /// Dropping the returned future cancels a pending delay; no lock is held
    /// while suspended.
    #[instrument(skip(self, args), fields(capability = %self.capability))]
    pub async fn resolve(&self, method: &str, args: &[Value]) -> Result<Value> {
        match self.begin(method, args) {
            Step::Done(outcome) => outcome,
            Step::Sleep(delay) => {
                tokio::time::sleep(delay).await;
                self.fallback_value(method)
            }
        }
    }

    /// Resolves a call on the current thread, sleeping for delayed behaviors.
    pub fn resolve_blocking(&self, method: &str, args: &[Value]) -> Result<Value> {
        match self.begin(method, args) {
            Step::Done(outcome) => outcome,
            Step::Sleep(delay) => {
                std::thread::sleep(delay);
                self.fallback_value(method)
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but gives up after `timeout` and
    /// returns [`MockError::Cancelled`].
    pub async fn resolve_with_timeout(
        &self,
        method: &str,
        args: &[Value],
        timeout: Duration,
    ) -> Result<Value> {
        match tokio::time::timeout(timeout, self.resolve(method, args)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(capability = %self.capability, method, ?timeout, "Mock resolution cancelled");
                Err(MockError::Cancelled {
                    method: method.to_string(),
                    waited: timeout,
                })
            }
        }
    }

    /// Resolves a call and converts the value into `T`.
    pub async fn resolve_as<T: DeserializeOwned>(&self, method: &str, args: &[Value]) -> Result<T> {
        let value = self.resolve(method, args).await?;
        convert(value)
    }

    /// Blocking counterpart of [`resolve_as`](Self::resolve_as).
    pub fn resolve_blocking_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<T> {
        let value = self.resolve_blocking(method, args)?;
        convert(value)
    }

    /// Resolves a call and checks the kind of the resolved value.
    pub async fn resolve_expecting(
        &self,
        method: &str,
        args: &[Value],
        expected: ValueKind,
    ) -> Result<Value> {
        let value = self.resolve(method, args).await?;
        check_kind(value, expected)
    }

    /// Blocking counterpart of [`resolve_expecting`](Self::resolve_expecting).
    pub fn resolve_blocking_expecting(
        &self,
        method: &str,
        args: &[Value],
        expected: ValueKind,
    ) -> Result<Value> {
        let value = self.resolve_blocking(method, args)?;
        check_kind(value, expected)
    }
}

fn check_kind(value: Value, expected: ValueKind) -> Result<Value> {
    let actual = ValueKind::of(&value);
    if actual != expected {
        return Err(MockError::InvalidResponseType {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(value)
}

fn convert<T: DeserializeOwned>(value: Value) -> Result<T> {
    let actual = ValueKind::of(&value);
    serde_json::from_value(value).map_err(|_| MockError::InvalidResponseType {
        expected: std::any::type_name::<T>().to_string(),
        actual,
    })
}
