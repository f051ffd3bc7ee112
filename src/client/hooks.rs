//! Lifecycle hooks: pure notification callbacks around one exchange.
//!
//! Consumers register zero or more handlers per extension point; handlers
//! for a point run in registration order and their return values are never
//! consumed. Parameter payloads are sanitized (password redacted) before
//! they reach any handler.

use std::fmt;
use std::sync::Arc;

use crate::transport::DeliveryResult;

type ParamsHook = dyn Fn(&[(String, String)]) + Send + Sync;
type ResultHook = dyn Fn(&DeliveryResult) + Send + Sync;

#[derive(Clone, Default)]
/// Observer collection for the four extension points.
pub struct Hooks {
    before_send: Vec<Arc<ParamsHook>>,
    after_decode: Vec<Arc<ResultHook>>,
    on_success: Vec<Arc<ResultHook>>,
    on_failure: Vec<Arc<ResultHook>>,
}

impl Hooks {
    /// Run before the request is sent, with the sanitized parameter set.
    pub fn before_send(&mut self, hook: impl Fn(&[(String, String)]) + Send + Sync + 'static) {
        self.before_send.push(Arc::new(hook));
    }

    /// Run after the response body has been decoded, success or not.
    pub fn after_decode(&mut self, hook: impl Fn(&DeliveryResult) + Send + Sync + 'static) {
        self.after_decode.push(Arc::new(hook));
    }

    /// Run when the decoded result reports success.
    pub fn on_success(&mut self, hook: impl Fn(&DeliveryResult) + Send + Sync + 'static) {
        self.on_success.push(Arc::new(hook));
    }

    /// Run when the decoded result reports failure, before any typed error
    /// is returned.
    pub fn on_failure(&mut self, hook: impl Fn(&DeliveryResult) + Send + Sync + 'static) {
        self.on_failure.push(Arc::new(hook));
    }

    pub(crate) fn notify_before_send(&self, params: &[(String, String)]) {
        for hook in &self.before_send {
            hook(params);
        }
    }

    pub(crate) fn notify_after_decode(&self, result: &DeliveryResult) {
        for hook in &self.after_decode {
            hook(result);
        }
    }

    pub(crate) fn notify_success(&self, result: &DeliveryResult) {
        for hook in &self.on_success {
            hook(result);
        }
    }

    pub(crate) fn notify_failure(&self, result: &DeliveryResult) {
        for hook in &self.on_failure {
            hook(result);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_send", &self.before_send.len())
            .field("after_decode", &self.after_decode.len())
            .field("on_success", &self.on_success.len())
            .field("on_failure", &self.on_failure.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn sample_result() -> DeliveryResult {
        DeliveryResult {
            status_code: 100,
            credits_remaining: None,
            message_ids: Vec::new(),
            error_message: None,
            raw_body: String::new(),
            declared_content_type: None,
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = Hooks::default();
        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            hooks.on_success(move |_| seen.lock().unwrap().push(label));
        }

        hooks.notify_success(&sample_result());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn points_are_independent() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = Hooks::default();
        {
            let calls = Arc::clone(&calls);
            hooks.before_send(move |_| calls.lock().unwrap().push("before"));
        }
        {
            let calls = Arc::clone(&calls);
            hooks.on_failure(move |_| calls.lock().unwrap().push("failure"));
        }

        hooks.notify_before_send(&[]);
        hooks.notify_success(&sample_result());
        assert_eq!(*calls.lock().unwrap(), vec!["before"]);
    }
}
