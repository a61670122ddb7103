// Versioned script callback dispatch

use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

mod dispatcher;
mod error;
pub mod escape;
pub mod event;
mod payload;
mod queue;

pub use dispatcher::{CallbackDispatcher, PreparedDispatch};
pub use error::DispatchError;
pub use escape::{decode_parameter, encode_parameter};
pub use event::{callback_key, EventSpec, PayloadSchema, EVENT_TABLE};
pub use payload::{EventPayload, Identified, NamedUpdate, TokenChange};
pub use queue::{ExecutionContext, QueueWorker, ScriptQueue, ScriptRunner};

/// Read access to a panel's callback map (callback key -> callback reference).
///
/// The map belongs to the panel; dispatch only ever reads it.
pub trait CallbackLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher> CallbackLookup for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl CallbackLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: BuildHasher + Clone> CallbackLookup for DashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|entry| entry.value().clone())
    }
}
