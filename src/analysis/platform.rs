use serde::{Deserialize, Serialize};

use crate::config::PlatformLimit;
use crate::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTier {
    WellWithin,
    Suitable,
    ExceedsLimit,
}

impl FitTier {
    /// Exactly one tier applies for any `char_count` when `max_chars > 0`.
    pub fn classify(char_count: usize, max_chars: usize) -> Self {
        if char_count > max_chars {
            FitTier::ExceedsLimit
        } else if char_count.saturating_mul(2) <= max_chars {
            FitTier::WellWithin
        } else {
            FitTier::Suitable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformFit {
    pub platform: String,
    pub suitable: bool,
    pub char_usage: String,
    #[serde(rename = "char_percentage")]
    pub usage_percent: f64,
    pub tier: FitTier,
    pub recommendation: String,
}

pub fn analyze_platform_fit(text: &str, platforms: &[PlatformLimit]) -> Vec<PlatformFit> {
    let char_count = text.chars().count();
    platforms
        .iter()
        .filter(|limit| limit.max_chars > 0)
        .map(|limit| platform_fit(char_count, limit))
        .collect()
}

pub fn platform_fit(char_count: usize, limit: &PlatformLimit) -> PlatformFit {
    let tier = FitTier::classify(char_count, limit.max_chars);
    PlatformFit {
        platform: limit.name.clone(),
        suitable: char_count <= limit.max_chars,
        char_usage: format!("{}/{}", char_count, limit.max_chars),
        usage_percent: round_to(char_count as f64 / limit.max_chars as f64 * 100.0, 1),
        tier,
        recommendation: recommendation(&limit.name, tier, char_count, limit.max_chars),
    }
}

fn recommendation(platform: &str, tier: FitTier, char_count: usize, max_chars: usize) -> String {
    let name = capitalize(platform);
    match tier {
        FitTier::WellWithin => format!("Perfect for {} - well within the limit", name),
        FitTier::Suitable => format!("Suitable for {}", name),
        FitTier::ExceedsLimit => format!(
            "Too long for {}: exceeds the limit by {} characters",
            name,
            char_count - max_chars
        ),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
