//! Progress tree model and ingestion normalization.
//!
//! The backend has described child nodes under two field names over time
//! (`children` and `criteria`). Both are folded into one ordered `children`
//! relation while deserializing, so nothing downstream ever inspects the
//! wire field names.

use crate::error::AchievementIdError;
use serde::{Deserialize, Serialize};

/// Base URL for external achievement references.
const WOWHEAD_ACHIEVEMENT_URL: &str = "https://www.wowhead.com/achievement=";

/// External reference link for an achievement id.
pub fn wowhead_url(id: u64) -> String {
    format!("{}{}", WOWHEAD_ACHIEVEMENT_URL, id)
}

/// `count/total` progress of a counted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub count: u64,
    pub total: u64,
}

/// One node of a progress tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStepNode", into = "RawStepNode")]
pub struct StepNode {
    pub id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub done: bool,
    pub progress: Option<Progress>,
    /// Completion time in unix seconds, when known.
    pub time: Option<i64>,
    pub children: Vec<StepNode>,
}

impl StepNode {
    /// A bare node with a name and done flag.
    pub fn new(id: Option<u64>, name: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            icon: None,
            done,
            progress: None,
            time: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<StepNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_progress(mut self, count: u64, total: u64) -> Self {
        self.progress = Some(Progress { count, total });
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Wire shape of a step node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawStepNode {
    #[serde(default, deserialize_with = "nonzero_id", skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, alias = "completed")]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<i64>,
    #[serde(default, deserialize_with = "nullable_list")]
    children: Vec<RawStepNode>,
    #[serde(default, deserialize_with = "nullable_list", skip_serializing_if = "Vec::is_empty")]
    criteria: Vec<RawStepNode>,
}

/// Ids are positive; the backend uses `0` for "no achievement".
fn nonzero_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.filter(|&id| id != 0))
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<RawStepNode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<RawStepNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RawStepNode> for StepNode {
    fn from(raw: RawStepNode) -> Self {
        let progress = raw.count.map(|count| Progress {
            count,
            total: raw.total.unwrap_or(0),
        });
        let children = raw
            .children
            .into_iter()
            .chain(raw.criteria)
            .map(StepNode::from)
            .collect();
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            description: raw.description.filter(|d| !d.trim().is_empty()),
            icon: raw.icon.filter(|i| !i.trim().is_empty()),
            done: raw.done,
            progress,
            time: raw.time,
            children,
        }
    }
}

impl From<StepNode> for RawStepNode {
    fn from(node: StepNode) -> Self {
        Self {
            id: node.id,
            name: Some(node.name),
            description: node.description,
            icon: node.icon,
            done: node.done,
            count: node.progress.map(|p| p.count),
            total: node.progress.map(|p| p.total),
            time: node.time,
            children: node.children.into_iter().map(RawStepNode::from).collect(),
            criteria: Vec::new(),
        }
    }
}

/// The achievement a progress tree is rooted at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInfo {
    #[serde(default, deserialize_with = "nonzero_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "completed")]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// Backend response for a resolved character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTree {
    pub parent: ParentInfo,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    pub steps: Vec<StepNode>,
}

impl ProgressTree {
    /// `character-server` label, preferring the display server name.
    pub fn subject(&self) -> Option<String> {
        if self.character.trim().is_empty() {
            return None;
        }
        let server = self
            .server_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.server);
        if server.trim().is_empty() {
            Some(self.character.clone())
        } else {
            Some(format!("{}-{}", self.character, server))
        }
    }
}

/// Error body reported by the backend for an unresolvable lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Everything a successful HTTP exchange can carry.
///
/// `Error` is listed first: an object with an `error` field is never a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupPayload {
    Error(ErrorPayload),
    Tree(ProgressTree),
}

impl LookupPayload {
    pub fn is_error(&self) -> bool {
        matches!(self, LookupPayload::Error(_))
    }
}

/// A realm entry from the realm directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub name: String,
    pub slug: String,
}

/// A well-known achievement offered in the lookup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedAchievement {
    pub id: u64,
    pub name: &'static str,
}

pub const SUGGESTED_ACHIEVEMENTS: &[SuggestedAchievement] = &[
    SuggestedAchievement {
        id: 19458,
        name: "A World Awoken (Dragonflight)",
    },
    SuggestedAchievement {
        id: 20501,
        name: "Back from the Beyond (Shadowlands)",
    },
    SuggestedAchievement {
        id: 40953,
        name: "A Farewell to Arms (Battle for Azeroth)",
    },
];

/// Parse a user-entered achievement id. Only plain decimal digits are accepted.
pub fn parse_achievement_id(input: &str) -> Result<u64, AchievementIdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AchievementIdError::Invalid {
            input: input.to_string(),
        });
    }
    trimmed.parse::<u64>().map_err(|_| AchievementIdError::Invalid {
        input: input.to_string(),
    })
}
