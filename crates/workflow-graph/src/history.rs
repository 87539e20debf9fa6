//! Snapshot-based undo/redo for workflows
//!
//! Each snapshot is the workflow's JSON document compressed with zstd.
//! Restoring a snapshot decodes it through [`from_document`], so every
//! restored workflow satisfies the same invariants as a freshly built one.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::codec::{from_document, to_document, WorkflowDocument};
use crate::constants::history as defaults;
use crate::error::{GraphError, Result};
use crate::workflow::Workflow;

/// History options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Snapshots kept before the oldest is dropped (at least 1)
    pub max_snapshots: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_snapshots: defaults::MAX_SNAPSHOTS,
        }
    }
}

/// Bounded undo/redo history of compressed workflow snapshots
pub struct WorkflowHistory {
    snapshots: VecDeque<Vec<u8>>,
    /// Index of the snapshot matching the caller's current state
    cursor: usize,
    max_snapshots: usize,
}

impl WorkflowHistory {
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            max_snapshots: max_snapshots.max(1),
        }
    }

    pub fn with_config(config: &HistoryConfig) -> Self {
        Self::new(config.max_snapshots)
    }

    /// Record a new state
    ///
    /// Discards anything that could have been redone, then drops the oldest
    /// snapshots beyond the limit.
    pub fn push(&mut self, workflow: &Workflow) -> Result<()> {
        let json = serde_json::to_vec(&to_document(workflow))?;
        let compressed = zstd::encode_all(&json[..], defaults::COMPRESSION_LEVEL)
            .map_err(|e| GraphError::Compression(e.to_string()))?;

        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(compressed);

        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;

        log::debug!(
            "Recorded workflow snapshot {}/{} ({} bytes)",
            self.snapshots.len(),
            self.max_snapshots,
            self.compressed_size()
        );
        Ok(())
    }

    /// Step back one snapshot, `None` at the oldest one
    pub fn undo(&mut self) -> Option<Result<Workflow>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.restore(self.cursor))
    }

    /// Step forward one snapshot, `None` at the newest one
    pub fn redo(&mut self) -> Option<Result<Workflow>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.restore(self.cursor))
    }

    /// The snapshot at the cursor
    pub fn current(&self) -> Option<Result<Workflow>> {
        if self.snapshots.is_empty() {
            None
        } else {
            Some(self.restore(self.cursor))
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }

    /// Total compressed size of all snapshots in bytes
    pub fn compressed_size(&self) -> usize {
        self.snapshots.iter().map(Vec::len).sum()
    }

    fn restore(&self, index: usize) -> Result<Workflow> {
        let compressed = self
            .snapshots
            .get(index)
            .ok_or_else(|| GraphError::Compression(format!("no snapshot at {}", index)))?;
        let json = zstd::decode_all(&compressed[..])
            .map_err(|e| GraphError::Compression(e.to_string()))?;
        let document: WorkflowDocument = serde_json::from_slice(&json)?;
        from_document(&document)
    }
}

impl Default for WorkflowHistory {
    fn default() -> Self {
        Self::with_config(&HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeCategory, Port, PortDataType, WorkflowMetadata};

    fn titled(title: &str) -> Workflow {
        let mut workflow = Workflow::with_metadata(WorkflowMetadata::new(title, "", "en-US"));
        let mut node = Node::new("note", "TextInOut", NodeCategory::TextProcessing);
        node.add_port(Port::input("text", PortDataType::Text)).unwrap();
        workflow.add_node(node).unwrap();
        workflow.set_port_value("note", "text", title).unwrap();
        workflow
    }

    fn title(result: Option<Result<Workflow>>) -> String {
        result.unwrap().unwrap().metadata().title.clone()
    }

    #[test]
    fn test_undo_walks_back() {
        let mut history = WorkflowHistory::new(10);
        for name in ["first", "second", "third"] {
            history.push(&titled(name)).unwrap();
        }

        assert_eq!(title(history.current()), "third");
        assert_eq!(title(history.undo()), "second");
        assert_eq!(title(history.undo()), "first");
        assert!(history.undo().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_redo_and_truncation() {
        let mut history = WorkflowHistory::new(10);
        history.push(&titled("first")).unwrap();
        history.push(&titled("second")).unwrap();

        history.undo();
        assert!(history.can_redo());
        assert_eq!(title(history.redo()), "second");
        assert!(history.redo().is_none());

        history.undo();
        history.push(&titled("third")).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(title(history.current()), "third");
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = WorkflowHistory::new(3);
        for i in 0..5 {
            history.push(&titled(&format!("state {}", i))).unwrap();
        }

        assert_eq!(history.len(), 3);
        assert_eq!(title(history.current()), "state 4");
        history.undo();
        assert_eq!(title(history.undo()), "state 2");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_restored_workflow_is_equal() {
        let mut history = WorkflowHistory::default();
        let workflow = titled("same");
        history.push(&workflow).unwrap();
        assert_eq!(history.current().unwrap().unwrap(), workflow);
        assert!(history.compressed_size() > 0);

        history.clear();
        assert!(history.is_empty());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_zero_limit_keeps_one_snapshot() {
        let mut history = WorkflowHistory::with_config(&HistoryConfig { max_snapshots: 0 });
        history.push(&titled("a")).unwrap();
        history.push(&titled("b")).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(title(history.current()), "b");
    }

    #[test]
    fn test_corrupt_snapshot_is_a_compression_error() {
        let mut history = WorkflowHistory::new(2);
        history.push(&titled("a")).unwrap();
        history.snapshots[0] = b"not zstd".to_vec();

        let err = history.current().unwrap().unwrap_err();
        assert!(matches!(err, GraphError::Compression(_)));
        assert!(!err.is_structural());
    }
}
