//! Reusable widget components.

pub mod choices;
pub mod detail;
pub mod progress;
pub mod status;
pub mod tree;

pub use choices::ChoiceRow;
pub use detail::DetailPanel;
pub use progress::ProgressBar;
pub use status::StatusIndicator;
pub use tree::{TreeItem, TreeStyle, TreeWidget};
