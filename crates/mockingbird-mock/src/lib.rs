//! # mockingbird-mock
//!
//! Mock objects with configurable behavior and recorded calls.
//!
//! A [`MockRegistry`] hands out [`MockInstance`]s keyed by capability id. Each
//! instance resolves calls through its configured [`MockBehavior`]s and logs
//! every call in a [`CallLedger`], which backs the helpers in [`verify`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use mockingbird_core::ErrorValue;
//! use mockingbird_mock::{verify, MockRegistry};
//! use serde_json::json;
//!
//! let registry = MockRegistry::new();
//! let api = registry.generate_mock("UserApi")?;
//! api.set_return_value("getUser", json!({"id": 1, "name": "ana"}));
//! api.set_error("fetchAvatar", ErrorValue::timeout("cdn down"));
//!
//! let user = api.resolve("getUser", &[json!(1)]).await?;
//! assert!(api.resolve("fetchAvatar", &[]).await.is_err());
//!
//! verify::expect_called_in_order(&api, &["getUser", "fetchAvatar"])?;
//! registry.reset_mocks();
//! ```

pub mod behavior;
pub mod error;
pub mod instance;
pub mod ledger;
pub mod policy;
pub mod registry;
pub mod value;
pub mod verify;

pub use behavior::{resolve_behavior, MockBehavior, Resolution, Resolver};
pub use error::{MockError, Result, VerificationError};
pub use instance::{MockInstance, ANONYMOUS_CAPABILITY};
pub use ledger::{CallLedger, CallRecord};
pub use policy::{DefaultPolicy, DefaultRule, NamePattern};
pub use registry::{CapabilityTemplate, MockRegistry, MockRegistryConfig};
pub use value::ValueKind;
