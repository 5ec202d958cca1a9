pub mod metrics;
pub mod platform;
pub mod readability;
pub mod social;
pub mod suggestions;

pub use metrics::{calculate_metrics, split_sentences, Metrics};
pub use platform::{analyze_platform_fit, FitTier, PlatformFit};
pub use readability::{analyze_readability, Readability};
pub use social::{analyze_social_elements, Occurrences, SocialElements};
pub use suggestions::{generate_suggestions, Priority, Suggestion, SuggestionKind};
