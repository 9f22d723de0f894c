//! Financial heuristics used to annotate assistant answers.
//!
//! A playbook is a JSON array of strategies:
//!
//! ```json
//! [{"topic": "Fraud Detection", "content": "duplicate invoices ...", "heuristic": "..."}]
//! ```
//!
//! Retrieval is keyword matching: a strategy matches when its topic occurs in
//! the query, or when any of the first five words of its content does.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Most strategies returned for one query.
pub const MAX_STRATEGIES: usize = 3;

/// Number of leading content words used as keywords.
const CONTENT_KEYWORDS: usize = 5;

/// Context line used when nothing in the playbook matches.
pub const GENERAL_STRATEGY: &str = "- [General Financial]: Ensure all transactions comply with local tax (SARS) and IFRS standards.";

/// One heuristic in the playbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// Short topic name, matched against queries.
    pub topic: String,
    /// Description; its leading words are matched against queries.
    pub content: String,
    /// The advice itself.
    pub heuristic: String,
}

impl Strategy {
    /// Create a strategy.
    pub fn new(
        topic: impl Into<String>,
        content: impl Into<String>,
        heuristic: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            content: content.into(),
            heuristic: heuristic.into(),
        }
    }

    fn matches(&self, query_lower: &str) -> bool {
        if query_lower.contains(&self.topic.to_lowercase()) {
            return true;
        }
        self.content
            .split_whitespace()
            .take(CONTENT_KEYWORDS)
            .any(|word| query_lower.contains(&word.to_lowercase()))
    }

    fn context_line(&self) -> String {
        format!("- [{}]: {}", self.topic, self.heuristic)
    }
}

/// An ordered list of strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playbook {
    strategies: Vec<Strategy>,
}

impl Playbook {
    /// Create a playbook from strategies.
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// The built-in seed playbook.
    pub fn seed() -> Self {
        Self::new(vec![
            Strategy::new(
                "Fraud Detection",
                "duplicate invoices vendor payments anomaly spikes outside business hours",
                "Flag payments to the same vendor with identical amounts within 48 hours and confirm them against purchase orders.",
            ),
            Strategy::new(
                "Cash Flow",
                "cash flow liquidity receivables payables timing",
                "Compare 30-day receivables against committed payables; a gap above 15% of monthly revenue needs a bridging plan.",
            ),
            Strategy::new(
                "Expense Optimization",
                "expense cost cloud subscriptions recurring overheads",
                "Review recurring costs quarterly and cancel subscriptions with no usage in the last 60 days.",
            ),
            Strategy::new(
                "Revenue Forecasting",
                "revenue forecast projection trend weekly sales",
                "Project next week's revenue from a 4-week moving average and report the change against last week.",
            ),
            Strategy::new(
                "VAT Compliance",
                "vat tax sars returns filing",
                "Reconcile output and input VAT monthly and file with SARS by the 25th of the following month.",
            ),
        ])
    }

    /// Load a playbook from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open playbook", err))?;
        let strategies: Vec<Strategy> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| Error::serialization("failed to parse playbook", Some(Box::new(err))))?;
        Ok(Self::new(strategies))
    }

    /// Load `path` when given, otherwise use the seed playbook.
    pub fn load_or_seed(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::seed()),
        }
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the playbook has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// The strategies, in order.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Context lines (`- [topic]: heuristic`) for the strategies matching
    /// `query`, at most [`MAX_STRATEGIES`].  Returns the general strategy when
    /// nothing matches.
    pub fn retrieve(&self, query: &str) -> Vec<String> {
        let query_lower = query.to_lowercase();
        let context: Vec<String> = self
            .strategies
            .iter()
            .filter(|s| s.matches(&query_lower))
            .take(MAX_STRATEGIES)
            .map(Strategy::context_line)
            .collect();
        if context.is_empty() {
            vec![GENERAL_STRATEGY.to_string()]
        } else {
            context
        }
    }
}

/// Reduce context lines to their `- [topic]` labels, as reported in replies.
pub fn strategy_labels(context: &[String]) -> Vec<String> {
    context
        .iter()
        .map(|line| line.split(':').next().unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_match() {
        let playbook = Playbook::seed();
        let context = playbook.retrieve("Any VAT Compliance issues this month?");
        assert!(context.iter().any(|c| c.starts_with("- [VAT Compliance]")));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let playbook = Playbook::new(vec![Strategy::new(
            "Payroll",
            "Salaries overtime bonuses",
            "Check overtime against rosters.",
        )]);
        assert_eq!(
            playbook.retrieve("why did SALARIES jump?"),
            vec!["- [Payroll]: Check overtime against rosters.".to_string()]
        );
    }

    #[test]
    fn only_leading_content_words_count() {
        let playbook = Playbook::new(vec![Strategy::new(
            "Payroll",
            "one two three four five salaries",
            "h",
        )]);
        assert_eq!(playbook.retrieve("salaries"), vec![GENERAL_STRATEGY.to_string()]);
    }

    #[test]
    fn general_when_nothing_matches() {
        assert_eq!(
            Playbook::seed().retrieve("hello there"),
            vec![GENERAL_STRATEGY.to_string()]
        );
        assert_eq!(
            Playbook::default().retrieve("revenue"),
            vec![GENERAL_STRATEGY.to_string()]
        );
    }

    #[test]
    fn capped_at_three() {
        let strategies = (0..6)
            .map(|i| Strategy::new(format!("Topic{i}"), "revenue", "h"))
            .collect();
        let context = Playbook::new(strategies).retrieve("revenue");
        assert_eq!(context.len(), MAX_STRATEGIES);
        assert_eq!(context[0], "- [Topic0]: h");
    }

    #[test]
    fn labels() {
        let labels = strategy_labels(&[
            "- [Cash Flow]: Compare receivables".to_string(),
            GENERAL_STRATEGY.to_string(),
        ]);
        assert_eq!(labels, vec!["- [Cash Flow]", "- [General Financial]"]);
    }

    #[test]
    fn parses_json() {
        let json = r#"[{"topic":"Audit","content":"ledger trail","heuristic":"Sample 5%."}]"#;
        let strategies: Vec<Strategy> = serde_json::from_str(json).unwrap();
        let playbook = Playbook::new(strategies);
        assert_eq!(playbook.len(), 1);
        assert_eq!(playbook.retrieve("ledger?"), vec!["- [Audit]: Sample 5%."]);
    }
}
