//! An offline transport that answers from a fixed script.
//!
//! Useful for demos without a model server: answers are picked by keyword,
//! and the playbook strategies that match the query are reported alongside,
//! the same way the model server reports them.

use std::time::Duration;

use crate::error::Result;
use crate::playbook::{Playbook, strategy_labels};
use crate::transport::Transport;
use crate::types::{QueryRequest, QueryResponse};

/// Simulated thinking time before a scripted answer.
pub const DEFAULT_SCRIPT_LATENCY: Duration = Duration::from_millis(1500);

const REVENUE_ANSWER: &str = "Based on current trends, your projected revenue for next week is R14,200. This is a 12% increase from last week.";
const EXPENSE_ANSWER: &str = "I've detected a recurring high expense in 'Cloud Infrastructure'. Would you like me to optimize this?";
const REPORT_ANSWER: &str = "I'm preparing that report now. It will be ready in a moment.";
const TRAINING_ANSWER: &str =
    "Model retraining is managed by your administrator; this assistant cannot start it.";
const DEFAULT_ANSWER: &str =
    "I'm processing that financial query against your ledger. One moment please...";

/// Keyword table, checked in order; the first rule with a matching keyword wins.
const SCRIPT: &[(&[&str], &str)] = &[
    (&["revenue", "money", "imali"], REVENUE_ANSWER),
    (&["expense", "cost"], EXPENSE_ANSWER),
    (&["report"], REPORT_ANSWER),
    (&["train", "model"], TRAINING_ANSWER),
];

/// Answer `query` from the script.
pub fn scripted_answer(query: &str) -> &'static str {
    let lower = query.to_lowercase();
    SCRIPT
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, answer)| *answer)
        .unwrap_or(DEFAULT_ANSWER)
}

/// Offline [`Transport`] that never fails.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    playbook: Playbook,
    latency: Duration,
}

impl ScriptedTransport {
    /// Create a scripted transport over the seed playbook.
    pub fn new() -> Self {
        Self::with_playbook(Playbook::seed())
    }

    /// Create a scripted transport over `playbook`.
    pub fn with_playbook(playbook: Playbook) -> Self {
        Self {
            playbook,
            latency: DEFAULT_SCRIPT_LATENCY,
        }
    }

    /// Set the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The playbook used for strategy annotations.
    pub fn playbook(&self) -> &Playbook {
        &self.playbook
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let context = self.playbook.retrieve(&request.query);
        Ok(QueryResponse::new(scripted_answer(&request.query))
            .with_strategies(strategy_labels(&context)))
    }
}
