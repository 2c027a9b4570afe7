//! achv Core - Progress Tree Pipeline
//!
//! Pure data structures and algorithms for achievement progress trees:
//! identity normalization, step-tree ingestion, lookup by id, rendering
//! with done propagation, completed-filtering and markdown export.
//! This crate performs no I/O.

pub mod error;
pub mod export;
pub mod filter;
pub mod identity;
pub mod locator;
pub mod model;
pub mod render;

pub use error::{AchievementIdError, IdentityError};
pub use export::{export_visible, EXPORT_FILE_NAME, EXPORT_TITLE};
pub use filter::{set_filter, FilterSummary};
pub use identity::{CacheKey, Identity, Region, CACHE_KEY_PREFIX};
pub use locator::{
    achievement_progress, find, reroot, AchievementProgress, CriterionProgress, ScopedTree,
};
pub use model::{
    parse_achievement_id, wowhead_url, ErrorPayload, LookupPayload, ParentInfo, Progress,
    ProgressTree, Realm, StepNode, SuggestedAchievement, SUGGESTED_ACHIEVEMENTS,
};
pub use render::{
    render, render_progress, render_scoped, Expansion, NodeId, RenderContext, RenderedNode,
    RenderedTree, TreeTitle,
};
