//! # Comment Threads
//!
//! Append-only comment trees stored as an arena: nodes live in a `Vec` and
//! refer to their parent and children by index. Replies never form cycles,
//! so indices are all the structure needs.
//!
//! On the wire a thread is the nested `Vec<Comment>` the card views render.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{Comment, CommentId, ViewerId};

#[derive(Debug, Clone, PartialEq)]
struct CommentNode {
    id: CommentId,
    author_id: ViewerId,
    text: String,
    timestamp: DateTime<Utc>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// All comments of one vehicle. Top-level order is chronological.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Comment>", into = "Vec<Comment>")]
pub struct CommentThread {
    nodes: Vec<CommentNode>,
    roots: Vec<usize>,
}

impl CommentThread {
    /// Number of top-level comments; this is what `totalComments` publishes.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of comments including every nested reply.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest id in the thread, if any.
    pub fn max_id(&self) -> Option<CommentId> {
        self.nodes.iter().map(|n| n.id).max()
    }

    /// Next id to hand out: one past the largest id in the thread.
    /// Fails once the id space is used up.
    pub fn next_id(&self) -> Result<CommentId> {
        let max = self.max_id().map_or(0, |id| id.0);
        max.checked_add(1)
            .map(CommentId)
            .ok_or_else(|| CoreError::validation("comment id space exhausted"))
    }

    /// Appends a top-level comment and returns its id.
    pub fn push_comment(
        &mut self,
        author_id: ViewerId,
        text: String,
        timestamp: DateTime<Utc>,
    ) -> Result<CommentId> {
        let id = self.next_id()?;
        let idx = self.insert_node(id, author_id, text, timestamp, None);
        self.roots.push(idx);
        Ok(id)
    }

    /// Appends a reply under `parent`.
    pub fn push_reply(
        &mut self,
        parent: CommentId,
        author_id: ViewerId,
        text: String,
        timestamp: DateTime<Utc>,
    ) -> Result<CommentId> {
        let parent_idx = self
            .position(parent)
            .ok_or_else(|| CoreError::comment_not_found(parent))?;
        let id = self.next_id()?;
        let idx = self.insert_node(id, author_id, text, timestamp, Some(parent_idx));
        self.nodes[parent_idx].children.push(idx);
        Ok(id)
    }

    /// Materializes one comment with its replies.
    pub fn get(&self, id: CommentId) -> Option<Comment> {
        self.position(id).map(|idx| self.materialize(idx))
    }

    /// Id of the comment `id` replies to, if it is a reply.
    pub fn parent_of(&self, id: CommentId) -> Option<CommentId> {
        let idx = self.position(id)?;
        self.nodes[idx].parent.map(|p| self.nodes[p].id)
    }

    /// Top-level comments with nested replies, in insertion order.
    pub fn to_tree(&self) -> Vec<Comment> {
        self.roots.iter().map(|&idx| self.materialize(idx)).collect()
    }

    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|n| seen.insert(n.id))
    }

    fn position(&self, id: CommentId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn insert_node(
        &mut self,
        id: CommentId,
        author_id: ViewerId,
        text: String,
        timestamp: DateTime<Utc>,
        parent: Option<usize>,
    ) -> usize {
        self.nodes.push(CommentNode {
            id,
            author_id,
            text,
            timestamp,
            parent,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn materialize(&self, idx: usize) -> Comment {
        let node = &self.nodes[idx];
        Comment {
            id: node.id,
            author_id: node.author_id.clone(),
            text: node.text.clone(),
            timestamp: node.timestamp,
            replies: node.children.iter().map(|&c| self.materialize(c)).collect(),
        }
    }

    fn load(&mut self, comment: Comment, parent: Option<usize>) -> usize {
        let Comment {
            id,
            author_id,
            text,
            timestamp,
            replies,
        } = comment;
        let idx = self.insert_node(id, author_id, text, timestamp, parent);
        for reply in replies {
            let child = self.load(reply, Some(idx));
            self.nodes[idx].children.push(child);
        }
        idx
    }
}

impl From<Vec<Comment>> for CommentThread {
    fn from(comments: Vec<Comment>) -> Self {
        let mut thread = Self::default();
        for comment in comments {
            let idx = thread.load(comment, None);
            thread.roots.push(idx);
        }
        thread
    }
}

impl From<CommentThread> for Vec<Comment> {
    fn from(thread: CommentThread) -> Self {
        thread.to_tree()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_replies_do_not_count_as_roots() {
        let mut thread = CommentThread::default();
        let first = thread
            .push_comment("ana".into(), "Great car".into(), ts())
            .unwrap();
        let reply = thread
            .push_reply(first, "owner".into(), "Thanks!".into(), ts())
            .unwrap();
        thread
            .push_comment("ben".into(), "Clean interior".into(), ts())
            .unwrap();

        assert_eq!(thread.root_count(), 2);
        assert_eq!(thread.len(), 3);
        assert_eq!(thread.parent_of(reply), Some(first));
        assert_eq!(thread.parent_of(first), None);

        let tree = thread.to_tree();
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].text, "Thanks!");
        assert_eq!(tree[1].text, "Clean interior");
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut thread = CommentThread::default();
        let a = thread.push_comment("ana".into(), "one".into(), ts()).unwrap();
        let b = thread.push_reply(a, "ben".into(), "two".into(), ts()).unwrap();
        let c = thread.push_comment("ana".into(), "three".into(), ts()).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_reply_to_missing_parent() {
        let mut thread = CommentThread::default();
        let err = thread
            .push_reply(CommentId(9), "ana".into(), "orphan".into(), ts())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(thread.is_empty());
    }

    #[test]
    fn test_exhausted_id_space_is_rejected() {
        let mut thread = CommentThread::from(vec![Comment {
            id: CommentId(u64::MAX),
            author_id: "ana".into(),
            text: "last one".into(),
            timestamp: ts(),
            replies: Vec::new(),
        }]);

        let err = thread
            .push_comment("ben".into(), "hello".into(), ts())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = thread
            .push_reply(CommentId(u64::MAX), "ben".into(), "hello".into(), ts())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(thread.len(), 1);
    }

    #[test]
    fn test_nested_json_shape() {
        let json = serde_json::json!([{
            "id": 4,
            "authorId": "ana",
            "text": "Great car",
            "timestamp": "2024-03-01T12:00:00Z",
            "replies": [{
                "id": 5,
                "authorId": "owner",
                "text": "Thanks!",
                "timestamp": "2024-03-01T12:05:00Z"
            }]
        }]);
        let thread: CommentThread = serde_json::from_value(json).unwrap();
        assert_eq!(thread.root_count(), 1);
        assert_eq!(thread.next_id().unwrap(), CommentId(6));
        assert_eq!(thread.max_id(), Some(CommentId(5)));
        assert_eq!(thread.get(CommentId(5)).unwrap().author_id.as_str(), "owner");

        let back = serde_json::to_value(&thread).unwrap();
        assert_eq!(back[0]["replies"][0]["text"], "Thanks!");
    }
}
