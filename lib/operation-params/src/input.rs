use http::Method;
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};
use tracing::trace;

use crate::object_or_raw::json_type_name;
use crate::operation_params::OperationParams;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to parse GraphQL request payload: {0}")]
    InvalidJson(#[from] sonic_rs::Error),
    #[error("GraphQL request payload must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("Batched GraphQL requests are not supported")]
    BatchNotSupported,
    #[error("Failed to parse query parameters: {0}")]
    InvalidQueryString(#[from] serde_urlencoded::de::Error),
}

/// Request parameters as sent by the client, before any normalization.
///
/// Order is preserved, so when a key is repeated (possibly with a different case)
/// the last occurrence wins once the params are normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams(Vec<(String, Value)>);

impl RawParams {
    /// Parses the body of a POST request with a JSON payload.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InputError> {
        let value: Value = sonic_rs::from_slice(body)?;

        if value.is_array() {
            return Err(InputError::BatchNotSupported);
        }

        let obj = value
            .as_object()
            .ok_or_else(|| InputError::NotAnObject(json_type_name(&value)))?;

        Ok(RawParams(
            obj.iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        ))
    }

    /// Parses url-encoded parameters, from the query string of a GET request
    /// or a `application/x-www-form-urlencoded` body.
    ///
    /// Every value is kept as a string, `variables` and `extensions` are expected
    /// to be JSON-encoded and get decoded by [`OperationParams::create`].
    pub fn from_query_string(query: &str) -> Result<Self, InputError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;

        trace!("parsed {} query parameters", pairs.len());

        Ok(RawParams(
            pairs
                .into_iter()
                .map(|(key, value)| (key, Value::from(value.as_str())))
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_operation_params(self, read_only: bool) -> OperationParams {
        OperationParams::create(self, read_only)
    }
}

impl IntoIterator for RawParams {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawParams {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        RawParams(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// Operations received over a safe HTTP method (GET, HEAD, OPTIONS, TRACE)
/// must be executed in a read-only context.
pub fn is_read_only_method(method: &Method) -> bool {
    method.is_safe()
}
