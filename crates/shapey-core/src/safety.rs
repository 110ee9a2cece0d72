//! Per-field failure isolation for transforms
//!
//! Every transform the engine runs goes through [`invoke`]. A transform
//! that returns an error, or panics, never takes the reshape down with it:
//! the spec's [`ErrorPolicy`] decides what value the failing field gets.
//!
//! | `shapeyDebug`  | policy                  | field value            |
//! |----------------|-------------------------|------------------------|
//! | absent/false   | [`ErrorPolicy::Silent`]  | `null`                 |
//! | `true`         | [`ErrorPolicy::Log`]     | `null`, plus a report  |
//! | `"skip"`       | [`ErrorPolicy::Skip`]    | the untransformed input|
//! | a function     | [`ErrorPolicy::Handler`] | whatever it returns    |
//!
//! The first [`invoke`] installs a process-wide panic hook that stays quiet
//! while a transform runs on the current thread and defers to the hook it
//! replaced everywhere else. A hook installed later replaces it.

use crate::error::TransformError;
use crate::spec::{Field, Spec, Transform};
use serde_json::{json, Value};
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

/// Receiver of transform failure reports
pub trait Diagnostics: Send + Sync {
    fn transform_failed(&self, field: &str, value: &Value, error: &TransformError);
}

/// Reports transform failures as `tracing` error events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn transform_failed(&self, field: &str, value: &Value, error: &TransformError) {
        tracing::error!(
            field = %field,
            value = %value,
            error = %error,
            "Transform failed on field \"{}\"",
            field
        );
    }
}

/// User-supplied recovery: `(error, field name, input value) -> replacement`
pub type ErrorHandler = Arc<dyn Fn(&TransformError, &str, &Value) -> Value + Send + Sync>;

/// What a failing transform's field becomes
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Field becomes `null`, nothing is reported
    #[default]
    Silent,
    /// Field becomes `null` and the failure is reported
    Log(Arc<dyn Diagnostics>),
    /// Field keeps its untransformed value
    Skip,
    /// Field becomes the handler's return value
    Handler(ErrorHandler),
}

impl ErrorPolicy {
    /// Report failures through [`TracingDiagnostics`]
    pub fn log() -> Self {
        ErrorPolicy::Log(Arc::new(TracingDiagnostics))
    }

    /// Report failures to a custom sink
    pub fn log_to(diagnostics: impl Diagnostics + 'static) -> Self {
        ErrorPolicy::Log(Arc::new(diagnostics))
    }

    /// Recover with a closure
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&TransformError, &str, &Value) -> Value + Send + Sync + 'static,
    {
        ErrorPolicy::Handler(Arc::new(f))
    }

    /// Interpret a `shapeyDebug` data value
    pub fn from_flag(flag: &Value) -> Self {
        match flag {
            Value::Bool(true) => Self::log(),
            Value::String(s) if s.trim().eq_ignore_ascii_case("skip") => ErrorPolicy::Skip,
            _ => ErrorPolicy::Silent,
        }
    }

    /// Use a transform as handler; it receives `[message, field, value]`
    pub fn from_transform(handler: Transform) -> Self {
        Self::handler(move |error, field, value| {
            handler
                .call(&[json!(error.to_string()), json!(field), value.clone()])
                .unwrap_or(Value::Null)
        })
    }

    /// Replacement value for a failed field
    pub fn recover(&self, error: &TransformError, field: &str, value: &Value) -> Value {
        match self {
            ErrorPolicy::Silent => Value::Null,
            ErrorPolicy::Log(diagnostics) => {
                diagnostics.transform_failed(field, value, error);
                Value::Null
            }
            ErrorPolicy::Skip => value.clone(),
            ErrorPolicy::Handler(handler) => handler(error, field, value),
        }
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Silent => write!(f, "Silent"),
            ErrorPolicy::Log(_) => write!(f, "Log"),
            ErrorPolicy::Skip => write!(f, "Skip"),
            ErrorPolicy::Handler(_) => write!(f, "Handler"),
        }
    }
}

/// Run a transform for `field`, resolving any failure through `policy`
///
/// The value handed to the policy is the first argument, or `null`.
pub fn invoke(transform: &Transform, field: &str, args: &[Value], policy: &ErrorPolicy) -> Value {
    install_quiet_hook();
    let outcome = {
        let _isolated = Isolation::enter();
        panic::catch_unwind(AssertUnwindSafe(|| transform.call(args)))
    }
    .unwrap_or_else(|payload| {
        Err(TransformError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    });

    match outcome {
        Ok(value) => value,
        Err(error) => {
            let original = args.first().unwrap_or(&Value::Null);
            policy.recover(&error, field, original)
        }
    }
}

thread_local! {
    // Nesting depth of `invoke` on this thread
    static ISOLATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_isolating() {
                previous(info);
            }
        }));
    });
}

/// Whether a transform is running under [`invoke`] on this thread
pub fn is_isolating() -> bool {
    ISOLATION_DEPTH.with(|depth| depth.get() > 0)
}

struct Isolation;

impl Isolation {
    fn enter() -> Self {
        ISOLATION_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Isolation
    }
}

impl Drop for Isolation {
    fn drop(&mut self) {
        ISOLATION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Copy of `spec` whose transforms can no longer fail
///
/// Each transform is wrapped so that failures resolve through the spec's
/// error policy; the copy itself is silent. Nested specs are left alone,
/// they carry their own policy.
pub fn wrap_transforms(spec: &Spec) -> Spec {
    let policy = spec.error_policy().clone();
    let mut wrapped = Spec::new();
    wrapped.set_mode(spec.mode());
    wrapped.set_transforms_mode(spec.transforms_mode());
    for (key, field) in spec.iter() {
        let field = match field {
            Field::Transform(transform) => {
                let inner = transform.clone();
                let name = key.to_string();
                let policy = policy.clone();
                let mut safe = Transform::variadic(transform.arity(), move |args| {
                    Ok(invoke(&inner, &name, args, &policy))
                });
                if let Some(label) = transform.name() {
                    safe = safe.named(label);
                }
                Field::Transform(safe)
            }
            other => other.clone(),
        };
        wrapped.insert(key, field);
    }
    wrapped
}
