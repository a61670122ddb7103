use super::error::DispatchError;
use super::escape::encode_parameter;
use super::event::PayloadSchema;
use serde::Serialize;
use std::borrow::Cow;
use uuid::Uuid;

/// Entities that can be identified to scripts
pub trait Identified {
    fn entity_id(&self) -> String;
}

impl Identified for str {
    fn entity_id(&self) -> String {
        self.to_string()
    }
}

impl Identified for String {
    fn entity_id(&self) -> String {
        self.clone()
    }
}

impl Identified for Uuid {
    fn entity_id(&self) -> String {
        self.to_string()
    }
}

/// The kind of update that caused a change (e.g. `MoveToken`)
pub trait NamedUpdate {
    fn update_name(&self) -> Cow<'_, str>;
}

impl NamedUpdate for str {
    fn update_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl NamedUpdate for String {
    fn update_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Builds invocation bodies for the schemas an event's versions declare
pub trait EventPayload {
    fn supports(&self, schema: PayloadSchema) -> bool;

    /// Body appended to the callback reference for `schema`
    fn render(&self, schema: PayloadSchema) -> Result<String, DispatchError>;
}

fn unsupported(schema: PayloadSchema) -> DispatchError {
    DispatchError::Payload(format!("{} schema not supported by this payload", schema))
}

/// Pure triggers carry no data
impl EventPayload for () {
    fn supports(&self, schema: PayloadSchema) -> bool {
        schema == PayloadSchema::Trigger
    }

    fn render(&self, schema: PayloadSchema) -> Result<String, DispatchError> {
        match schema {
            PayloadSchema::Trigger => Ok(String::new()),
            other => Err(unsupported(other)),
        }
    }
}

/// Data for a token change event
#[derive(Clone, Debug, PartialEq)]
pub struct TokenChange {
    token_id: String,
    update: Option<String>,
    parameters: Option<Vec<String>>,
}

/// Version-2 body; field order here is the wire order
#[derive(Serialize)]
struct TokenChangeBody<'a> {
    #[serde(rename = "tokenId")]
    token_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<String>>,
}

impl TokenChange {
    pub fn new<E: Identified + ?Sized>(token: &E) -> Self {
        Self {
            token_id: token.entity_id(),
            update: None,
            parameters: None,
        }
    }

    pub fn with_update<U: NamedUpdate + ?Sized>(mut self, update: &U) -> Self {
        self.update = Some(update.update_name().into_owned());
        self
    }

    /// Contextual parameters, passed to scripts escaped and in order
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn update(&self) -> Option<&str> {
        self.update.as_deref()
    }

    pub fn parameters(&self) -> Option<&[String]> {
        self.parameters.as_deref()
    }

    fn render_record(&self) -> Result<String, DispatchError> {
        let body = TokenChangeBody {
            token_id: &self.token_id,
            update: self.update.as_deref(),
            parameters: self
                .parameters
                .as_ref()
                .map(|params| params.iter().map(|p| encode_parameter(p)).collect()),
        };

        let mut json =
            serde_json::to_string(&body).map_err(|e| DispatchError::Payload(e.to_string()))?;
        json.push(';');
        Ok(json)
    }
}

impl EventPayload for TokenChange {
    fn supports(&self, schema: PayloadSchema) -> bool {
        matches!(schema, PayloadSchema::TokenId | PayloadSchema::TokenChange)
    }

    fn render(&self, schema: PayloadSchema) -> Result<String, DispatchError> {
        match schema {
            PayloadSchema::TokenId => Ok(self.token_id.clone()),
            PayloadSchema::TokenChange => self.render_record(),
            other => Err(unsupported(other)),
        }
    }
}
