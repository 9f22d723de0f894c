use serde::{Deserialize, Serialize};

/// Body of a request to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's text, sent as typed.
    pub query: String,
}

impl QueryRequest {
    /// Create a request for the given query text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Body of a successful reply from the inference endpoint.
///
/// Only `response` is required.  The model server also reports which playbook
/// strategies it drew on; older servers omit the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The assistant's answer.
    pub response: String,

    /// Topics of the playbook strategies used to build the answer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strategies_used: Vec<String>,
}

impl QueryResponse {
    /// Create a reply with no strategy metadata.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            strategies_used: Vec::new(),
        }
    }

    /// Attach strategy topics to the reply.
    pub fn with_strategies(mut self, strategies: Vec<String>) -> Self {
        self.strategies_used = strategies;
        self
    }
}

/// Reply from the model server's health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "online" when the server is ready.
    pub status: String,

    /// Identifier of the model being served.
    pub model: String,
}

impl HealthStatus {
    /// Returns true if the server reports itself online.
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let json = serde_json::to_string(&QueryRequest::new("ping")).unwrap();
        assert_eq!(json, r#"{"query":"ping"}"#);
    }

    #[test]
    fn response_without_strategies() {
        let reply: QueryResponse =
            serde_json::from_str(r#"{"response":"R14,200 projected"}"#).unwrap();
        assert_eq!(reply, QueryResponse::new("R14,200 projected"));
    }

    #[test]
    fn response_with_strategies() {
        let reply: QueryResponse = serde_json::from_str(
            r#"{"response":"Check the vendor.","strategies_used":["- [Fraud]"]}"#,
        )
        .unwrap();
        assert_eq!(reply.strategies_used, vec!["- [Fraud]".to_string()]);
    }

    #[test]
    fn response_requires_text() {
        assert!(serde_json::from_str::<QueryResponse>(r#"{"answer":"hi"}"#).is_err());
        assert!(serde_json::from_str::<QueryResponse>(r#"{"response":42}"#).is_err());
    }

    #[test]
    fn health() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"online","model":"Qwen/Qwen2.5-1.5B-Instruct"}"#)
                .unwrap();
        assert!(health.is_online());
    }
}
