// Client-side heuristic classifiers
// Pure functions over raw message text

mod language;
mod topic;

pub use language::{detect_language, language_scores, Language};
pub use topic::{classify_topic, TopicRelevance};
