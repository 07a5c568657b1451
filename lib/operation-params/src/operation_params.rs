use serde::Serialize;
use sonic_rs::{JsonValueTrait, Value};
use tracing::trace;

use crate::object_or_raw::{JsonObject, ObjectOrRaw};

/// Request parameters that carry the id of a persisted document, ordered by priority.
/// `documentId` and `id` are historical aliases of `queryId`.
const QUERY_ID_ALIASES: [&str; 3] = ["queryid", "documentid", "id"];

/// Parsed HTTP parameters of a single GraphQL operation.
///
/// Built once per request with [`OperationParams::create`] and never mutated afterwards.
/// No validation happens here: a request without `query` and without `queryId`,
/// or with `variables` that are not an object, is still turned into `OperationParams`,
/// and it's up to the executor to reject it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParams {
    query: Option<String>,
    query_id: Option<String>,
    operation: Option<String>,
    variables: ObjectOrRaw,
    extensions: ObjectOrRaw,
    #[serde(skip)]
    original_input: JsonObject,
    read_only: bool,
}

impl OperationParams {
    /// Normalizes the raw request parameters, coming either from a JSON body
    /// or from the query string.
    ///
    /// Keys are matched case-insensitively, `variables` and `extensions` may be sent
    /// as JSON-encoded strings, and an empty `variables` string means no variables.
    /// `read_only` should be `true` when the request came over a safe method like GET.
    pub fn create<I, K>(raw_params: I, read_only: bool) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let original_input: JsonObject = raw_params
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_ascii_lowercase(), value))
            .collect();

        let raw_query = non_null(original_input.get("query"));
        let raw_query_id = QUERY_ID_ALIASES
            .iter()
            .find_map(|alias| non_null(original_input.get(*alias)));

        let mut query_id = raw_query_id.and_then(as_string);
        let query = raw_query.and_then(as_string);
        let operation = non_null(original_input.get("operationname")).and_then(as_string);
        let variables = ObjectOrRaw::from_field("variables", original_input.get("variables"));
        let extensions = ObjectOrRaw::from_field("extensions", original_input.get("extensions"));

        // Apollo clients may send the persisted document hash only in the extensions
        if is_blank(raw_query) && is_blank(raw_query_id) {
            if let Some(hash) = persisted_query_hash(&extensions) {
                trace!(hash, "using persisted query hash from extensions as the query id");
                query_id = Some(hash.to_string());
            }
        }

        OperationParams {
            query,
            query_id,
            operation,
            variables,
            extensions,
            original_input,
            read_only,
        }
    }

    /// The GraphQL document, when sent inline.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Id of a persisted document.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Name of the operation to execute, from `operationName`.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn variables(&self) -> &ObjectOrRaw {
        &self.variables
    }

    pub fn extensions(&self) -> &ObjectOrRaw {
        &self.extensions
    }

    /// `extensions.persistedQuery.sha256Hash`, when present.
    ///
    /// Returned even if an explicit `queryId` took precedence over it,
    /// so the two can be compared by the caller.
    pub fn persisted_query_hash(&self) -> Option<&str> {
        persisted_query_hash(&self.extensions)
    }

    /// All parameters as received, with lower-cased keys and values left untouched.
    pub fn original_input(&self) -> &JsonObject {
        &self.original_input
    }

    /// Raw value of a parameter as received, before any decoding.
    /// Keys are stored lower-cased, so `key` is expected to be lower-case too.
    pub fn get_original_input(&self, key: &str) -> Option<&Value> {
        self.original_input.get(key)
    }

    /// Whether the operation is executed in a read-only context (e.g. HTTP GET),
    /// in which case mutations must not be executed.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(value) => value.is_null() || value.as_str().is_some_and(str::is_empty),
    }
}

fn persisted_query_hash(extensions: &ObjectOrRaw) -> Option<&str> {
    extensions
        .get("persistedQuery")
        .and_then(|persisted_query| persisted_query.get("sha256Hash"))
        .and_then(|hash| hash.as_str())
}
