//! The capability a chat session uses to reach the assistant.

use std::sync::Arc;

use crate::error::Result;
use crate::types::{QueryRequest, QueryResponse};

/// Sends one query and waits for the reply.
///
/// Implementations report every failure as an [`Error`](crate::Error); the
/// chat session decides how failures are shown.  The HTTP implementation is
/// [`InferenceClient`](crate::InferenceClient) and the offline one is
/// [`ScriptedTransport`](crate::ScriptedTransport).  Tests substitute their own.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the parsed reply.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        (**self).query(request).await
    }
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        (**self).query(request).await
    }
}
