/// Posts and interaction events
///
/// Reacting, commenting, sharing, and saving are the primary actions;
/// notification fan-out happens here as an explicit call after each record
/// is created, never as a hidden save hook.

mod manager;

pub use manager::PostManager;

use serde::{Deserialize, Serialize};

/// Reaction kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Love,
    Like,
    Angry,
    Sad,
    Haha,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Love => "love",
            ReactionKind::Like => "like",
            ReactionKind::Angry => "angry",
            ReactionKind::Sad => "sad",
            ReactionKind::Haha => "haha",
        }
    }
}

/// What a react call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactOutcome {
    /// A new reaction was recorded
    Added,
    /// The same reaction was repeated, toggling it off
    Removed,
    /// An existing reaction switched kind
    Changed,
}

/// Create post request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Interaction request (react / share / save)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractRequest {
    pub action: InteractAction,
    pub kind: Option<ReactionKind>,
}

/// Interaction action discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractAction {
    React,
    Share,
    Save,
}

/// Comment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}
