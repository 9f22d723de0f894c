use biometrics::{Collector, Counter, Moments};

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("imali.chat.submissions");
pub(crate) static CHAT_REJECTED_BUSY: Counter = Counter::new("imali.chat.rejected_busy");
pub(crate) static CHAT_REJECTED_EMPTY: Counter = Counter::new("imali.chat.rejected_empty");
pub(crate) static CHAT_REPLIES: Counter = Counter::new("imali.chat.replies");
pub(crate) static CHAT_FALLBACKS: Counter = Counter::new("imali.chat.fallbacks");
pub(crate) static CHAT_CYCLE_DURATION: Moments =
    Moments::new("imali.chat.cycle_duration_seconds");

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("imali.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("imali.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("imali.client.request_duration_seconds");

pub(crate) static AUTH_SIGN_INS: Counter = Counter::new("imali.auth.sign_ins");
pub(crate) static AUTH_SIGN_UPS: Counter = Counter::new("imali.auth.sign_ups");
pub(crate) static AUTH_FAILURES: Counter = Counter::new("imali.auth.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_REJECTED_BUSY);
    collector.register_counter(&CHAT_REJECTED_EMPTY);
    collector.register_counter(&CHAT_REPLIES);
    collector.register_counter(&CHAT_FALLBACKS);
    collector.register_moments(&CHAT_CYCLE_DURATION);

    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&AUTH_SIGN_INS);
    collector.register_counter(&AUTH_SIGN_UPS);
    collector.register_counter(&AUTH_FAILURES);
}
