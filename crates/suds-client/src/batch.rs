//! Bulk comment count batching.
//!
//! Ids are packed in order into batches whose approximate serialized size is
//! the endpoint URL length plus the length of every id appended so far, both
//! counted in UTF-16 code units as a browser would measure them. A new
//! batch is opened before appending an id only when the current batch has
//! already reached the budget, so a batch can end slightly above it.

use futures_util::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SudsError};
use crate::transport::{Payload, Transport};
use crate::types::CommentCounts;

/// One group of article ids sent in a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleIdBatch {
    /// Approximate serialized size of the request
    pub size: usize,
    pub article_ids: Vec<String>,
}

/// Splits id lists under a URL size budget and runs the batches concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    max_url_size: usize,
}

impl BatchPlanner {
    pub fn new(max_url_size: usize) -> Self {
        Self { max_url_size }
    }

    pub fn max_url_size(&self) -> usize {
        self.max_url_size
    }

    /// Group `article_ids` for an endpoint whose URL is `base_len` units long.
    pub fn plan<S: AsRef<str>>(&self, base_len: usize, article_ids: &[S]) -> Vec<ArticleIdBatch> {
        let mut batches: Vec<ArticleIdBatch> = Vec::new();

        for id in article_ids {
            let id = id.as_ref();
            let needs_new = batches
                .last()
                .is_none_or(|batch| batch.size >= self.max_url_size);
            if needs_new {
                batches.push(ArticleIdBatch {
                    size: base_len,
                    article_ids: Vec::new(),
                });
            }
            if let Some(batch) = batches.last_mut() {
                batch.article_ids.push(id.to_string());
                batch.size += utf16_len(id);
            }
        }

        batches
    }

    /// Fetch the counts of `article_ids` from `url`, one request per batch.
    ///
    /// All batches run to completion; if any failed, the first failure in
    /// batch order is returned and the other results are discarded.
    pub async fn fetch_counts<S: AsRef<str>>(
        &self,
        transport: &dyn Transport,
        url: &str,
        article_ids: &[S],
    ) -> Result<CommentCounts> {
        let batches = self.plan(utf16_len(url), article_ids);
        debug!(
            ids = article_ids.len(),
            batches = batches.len(),
            max_url_size = self.max_url_size,
            "Planned comment count batches"
        );

        let calls = batches.iter().map(|batch| {
            let mut payload = Payload::new();
            payload.insert("articleIds".into(), Value::from(batch.article_ids.clone()));
            async move { transport.call(url, &payload).await }
        });
        let responses = join_all(calls).await;

        let mut merged = CommentCounts::new();
        for response in responses {
            merge_counts(&mut merged, response?)?;
        }
        Ok(merged)
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self::new(1000)
    }
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn merge_counts(merged: &mut CommentCounts, response: Value) -> Result<()> {
    match response {
        Value::Null => Ok(()),
        Value::Object(map) => {
            for (article_id, count) in map {
                let count = count.as_u64().ok_or_else(|| {
                    SudsError::invalid_response(format!(
                        "comment count of {article_id} is not a non-negative integer"
                    ))
                })?;
                merged.insert(article_id, count);
            }
            Ok(())
        }
        other => Err(SudsError::invalid_response(format!(
            "expected comment count mapping, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(batches: &[ArticleIdBatch]) -> Vec<usize> {
        batches.iter().map(|b| b.article_ids.len()).collect()
    }

    #[test]
    fn empty_input_plans_nothing() {
        let ids: [&str; 0] = [];
        assert!(BatchPlanner::default().plan(10, &ids).is_empty());
    }

    #[test]
    fn small_input_fits_one_batch() {
        let batches = BatchPlanner::default().plan(50, &["a-1", "a-2", "a-3"]);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].size, 50 + 9);
        assert_eq!(batches[0].article_ids, vec!["a-1", "a-2", "a-3"]);
    }

    #[test]
    fn new_batch_opens_once_budget_reached() {
        // base 10 + 10 ids of 10 chars: sizes 20, 30 ... 100 reaches 100 after 9 ids
        let ids: Vec<String> = (0..12).map(|i| format!("article-{i:02}")).collect();
        let batches = BatchPlanner::new(100).plan(10, &ids);

        assert_eq!(sizes(&batches), vec![9, 3]);
        assert_eq!(batches[0].size, 100);
        assert_eq!(batches[1].size, 40);
        assert_eq!(batches[1].article_ids[0], "article-09");
    }

    #[test]
    fn batch_may_overshoot_after_last_append() {
        // 95 < 100 so the long id still joins the first batch
        let ids = ["x".repeat(85), "y".repeat(30), "z".to_string()];
        let batches = BatchPlanner::new(100).plan(10, &ids);

        assert_eq!(sizes(&batches), vec![2, 1]);
        assert_eq!(batches[0].size, 125);
    }

    #[test]
    fn base_over_budget_gives_one_id_per_batch() {
        let batches = BatchPlanner::new(10).plan(20, &["a", "b", "c"]);
        assert_eq!(sizes(&batches), vec![1, 1, 1]);
    }

    #[test]
    fn order_is_preserved_across_batches() {
        let ids: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let batches = BatchPlanner::new(30).plan(20, &ids);

        let flattened: Vec<String> = batches.into_iter().flat_map(|b| b.article_ids).collect();
        assert_eq!(flattened, ids);
    }

    #[test]
    fn size_counts_utf16_units_not_bytes() {
        // "é" is 2 bytes but 1 unit, so 9 of them stay under a budget of 10
        let ids: Vec<String> = (0..9).map(|_| "é".to_string()).collect();
        let batches = BatchPlanner::new(10).plan(0, &ids);
        assert_eq!(sizes(&batches), vec![9]);
        assert_eq!(batches[0].size, 9);

        // astral characters take two units
        let batches = BatchPlanner::new(4).plan(0, &["😀", "😀", "😀"]);
        assert_eq!(sizes(&batches), vec![2, 1]);
    }

    #[test]
    fn merge_rejects_non_mapping() {
        let mut merged = CommentCounts::new();
        assert!(merge_counts(&mut merged, Value::Null).is_ok());
        assert!(merge_counts(&mut merged, serde_json::json!({ "a": 2 })).is_ok());
        assert_eq!(merged["a"], 2);
        assert!(merge_counts(&mut merged, serde_json::json!([1, 2])).is_err());
        assert!(merge_counts(&mut merged, serde_json::json!({ "b": "many" })).is_err());
    }
}
