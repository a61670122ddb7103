use super::error::DispatchError;
use super::event::{
    lookup_event, EventSpec, EVENT_TABLE, ON_CHANGE_IMPERSONATED, ON_CHANGE_SELECTION,
    ON_CHANGE_TOKEN,
};
use super::payload::{EventPayload, TokenChange};
use super::queue::ExecutionContext;
use super::CallbackLookup;
use tracing::debug;

/// An event resolved against the event table with a payload able to render
/// every version it declares.
pub struct PreparedDispatch<'p> {
    event: &'static EventSpec,
    payload: &'p dyn EventPayload,
}

impl PreparedDispatch<'_> {
    pub fn event_name(&self) -> &'static str {
        self.event.name
    }
}

/// Resolves event callbacks from a caller-owned map and submits invocations
/// to an execution context.
///
/// Holds no callback state of its own; the map is passed into every call and
/// only read.
pub struct CallbackDispatcher<C> {
    context: C,
    table: &'static [EventSpec],
}

impl<C: ExecutionContext> CallbackDispatcher<C> {
    /// Dispatcher over the built-in event table
    pub fn new(context: C) -> Self {
        Self::with_table(context, EVENT_TABLE)
    }

    pub fn with_table(context: C, table: &'static [EventSpec]) -> Self {
        Self { context, table }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Check `event_name` and `payload` against the event table.
    ///
    /// Fails on an unknown event or on a payload that cannot render one of the
    /// event's schemas, before anything is submitted.
    pub fn prepare<'p>(
        &self,
        event_name: &str,
        payload: &'p dyn EventPayload,
    ) -> Result<PreparedDispatch<'p>, DispatchError> {
        let event = lookup_event(self.table, event_name)
            .ok_or_else(|| DispatchError::UnknownEvent(event_name.to_string()))?;

        if let Some((version, schema)) = event.versions().find(|(_, s)| !payload.supports(*s)) {
            return Err(DispatchError::UnsupportedSchema {
                event: event.name,
                version,
                schema,
            });
        }

        Ok(PreparedDispatch { event, payload })
    }

    /// Submit one invocation per registered version, lowest version first.
    ///
    /// Versions with no entry in `callbacks` are skipped. Every invocation is
    /// rendered before any is submitted, and the batch is enqueued whole or
    /// not at all. Returns the number of invocations submitted.
    pub fn dispatch<L>(
        &self,
        prepared: &PreparedDispatch<'_>,
        callbacks: &L,
    ) -> Result<usize, DispatchError>
    where
        L: CallbackLookup + ?Sized,
    {
        let mut invocations = Vec::new();

        for (version, schema) in prepared.event.versions() {
            let key = prepared.event.callback_key(version);
            let Some(reference) = callbacks.lookup(&key) else {
                debug!(event = prepared.event.name, key = %key, "No callback registered");
                continue;
            };

            let body = prepared.payload.render(schema)?;
            let mut invocation = reference;
            invocation.push_str(&body);

            debug!(
                event = prepared.event.name,
                key = %key,
                version = version,
                "Built callback invocation"
            );
            invocations.push(invocation);
        }

        let submitted = invocations.len();
        if submitted > 0 {
            self.context.submit_all(invocations)?;
        }

        Ok(submitted)
    }

    /// Prepare and dispatch in one step
    pub fn fire<L>(
        &self,
        event_name: &str,
        callbacks: &L,
        payload: &dyn EventPayload,
    ) -> Result<usize, DispatchError>
    where
        L: CallbackLookup + ?Sized,
    {
        let prepared = self.prepare(event_name, payload)?;
        self.dispatch(&prepared, callbacks)
    }

    pub fn selection_changed<L>(&self, callbacks: &L) -> Result<usize, DispatchError>
    where
        L: CallbackLookup + ?Sized,
    {
        self.fire(ON_CHANGE_SELECTION, callbacks, &())
    }

    pub fn impersonated_changed<L>(&self, callbacks: &L) -> Result<usize, DispatchError>
    where
        L: CallbackLookup + ?Sized,
    {
        self.fire(ON_CHANGE_IMPERSONATED, callbacks, &())
    }

    /// Fires `onChangeToken` (bare id) and `onChangeToken_2` (JSON record)
    pub fn token_changed<L>(&self, change: &TokenChange, callbacks: &L) -> Result<usize, DispatchError>
    where
        L: CallbackLookup + ?Sized,
    {
        self.fire(ON_CHANGE_TOKEN, callbacks, change)
    }
}
