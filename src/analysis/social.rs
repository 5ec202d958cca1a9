use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Emoji the analyzer recognises. Matched as substrings, so sequences with a
/// variation selector only match when the selector is present in the text.
pub const EMOJI_TABLE: &[&str] = &[
    "😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😉", "😊", "😋", "😎", "😍", "😘", "🥰", "😗", "😙",
    "😚", "🙂", "🤗", "🤩", "🤔", "🤨", "😐", "😑", "😶", "🙄", "😏", "😣", "😥", "😮", "🤐", "😯", "😪",
    "😫", "😴", "😌", "😛", "😜", "😝", "🤤", "😒", "😓", "😔", "😕", "🙃", "🤑", "😲", "🙁", "😖", "😞",
    "😟", "😤", "😢", "😭", "😦", "😧", "😨", "😩", "🤯", "😬", "😰", "😱", "🥵", "🥶", "😳", "🤪", "😵",
    "😡", "😠", "🤬", "😷", "🤒", "🤕", "🤢", "🤮", "🤧", "😇", "🥳", "🥴", "🥺", "🤠", "🤡", "🤥", "🤫",
    "🤭", "🧐", "🤓", "😈", "👿", "👹", "👺", "💀", "👻", "👽", "🤖", "💩", "❤\u{FE0F}", "🧡", "💛", "💚",
    "💙", "💜", "🖤", "🤍", "🤎", "💔", "❣\u{FE0F}", "💕", "💖", "💗", "💘", "💝", "💟", "♥\u{FE0F}",
    "💌", "💤", "💢", "💣", "💥", "💦", "💨", "💫", "💬", "👁\u{FE0F}\u{200D}🗨\u{FE0F}", "🗨\u{FE0F}",
    "🗯\u{FE0F}", "💭", "💮", "♨\u{FE0F}", "💈", "🛑", "🕛", "🕧", "🕐", "🕜", "🕑", "🕝", "🕒", "🕞",
    "🕓", "🕟", "🕔", "🕠", "🕕", "🕡", "🕖", "🕢", "🕗", "🕣", "🕘", "🕤", "🕙", "🕥", "🕚", "🕦", "🌍",
    "🌎", "🌏", "🌐", "🗺\u{FE0F}", "🗾", "🧭", "🏔\u{FE0F}", "⛰\u{FE0F}", "🌋", "🗻", "🏕\u{FE0F}",
    "🏖\u{FE0F}", "🏜\u{FE0F}", "🏝\u{FE0F}", "🏞\u{FE0F}", "🏟\u{FE0F}", "🏛\u{FE0F}",
    "🏗\u{FE0F}", "🧱", "🏘\u{FE0F}", "🏚\u{FE0F}", "🏠", "🏡", "🏢", "🏣", "🏤", "🏥", "🏦", "🏨",
    "🏩", "🏪", "🏫", "🏬", "🏭", "🏯", "🏰", "🗼", "🗽", "⛪", "🕌", "🛕", "🕍", "⛩\u{FE0F}", "🕋", "⛲",
    "⛺", "🌁", "🌃", "🏙\u{FE0F}", "🌄", "🌅", "🌆", "🌇", "🌉", "🎠", "🎡", "🎢", "🎪", "🚂", "🚃", "🚄",
    "🚅", "🚆", "🚇", "🚈", "🚉", "🚊", "🚝", "🚞", "🚋", "🚌", "🚍", "🚎", "🚐", "🚑", "🚒", "🚓", "🚔",
    "🚕", "🚖", "🚗", "🚘", "🚙", "🚚", "🚛", "🚜", "🏎\u{FE0F}", "🏍\u{FE0F}", "🛵", "🦽", "🦼", "🛴",
    "🚲", "🛺", "🚨", "🚡", "🚠", "🚟", "✈\u{FE0F}", "🛫", "🛬", "🛩\u{FE0F}", "💺", "🛰\u{FE0F}",
    "🚀", "🛸", "🚁", "🛶", "⛵", "🚤", "🛥\u{FE0F}", "🛳\u{FE0F}", "⛴\u{FE0F}", "🚢", "⚓", "⛽",
    "🚧", "🚦", "🚥", "🚏", "🗿", "⛱\u{FE0F}", "💒", "🛤\u{FE0F}", "🛣\u{FE0F}", "🎑", "🌠", "🎇",
    "🎆", "🌌",
];

pub const CTA_KEYWORDS: &[&str] = &[
    "click",
    "share",
    "comment",
    "like",
    "follow",
    "subscribe",
    "buy",
    "learn",
    "discover",
    "explore",
    "join",
    "sign up",
    "check out",
    "visit",
    "download",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrences {
    pub count: usize,
    pub list: Vec<String>,
}

impl Occurrences {
    fn new(list: Vec<String>) -> Self {
        Self {
            count: list.len(),
            list,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialElements {
    pub hashtags: Occurrences,
    pub mentions: Occurrences,
    pub urls: Occurrences,
    pub emojis: Occurrences,
    #[serde(rename = "questions")]
    pub question_count: usize,
    #[serde(rename = "exclamations")]
    pub exclamation_count: usize,
    #[serde(rename = "cta_elements")]
    pub cta_count: usize,
}

impl SocialElements {
    pub fn hashtag_count(&self) -> usize {
        self.hashtags.count
    }

    pub fn emoji_count(&self) -> usize {
        self.emojis.count
    }
}

pub fn extract_hashtags(text: &str) -> Vec<String> {
    static RE_HASHTAG: OnceLock<Regex> = OnceLock::new();
    let re = RE_HASHTAG.get_or_init(|| Regex::new(r"#\w+").unwrap());
    collect_matches(re, text)
}

pub fn extract_mentions(text: &str) -> Vec<String> {
    static RE_MENTION: OnceLock<Regex> = OnceLock::new();
    let re = RE_MENTION.get_or_init(|| Regex::new(r"@\w+").unwrap());
    collect_matches(re, text)
}

pub fn extract_urls(text: &str) -> Vec<String> {
    static RE_URL: OnceLock<Regex> = OnceLock::new();
    let re = RE_URL.get_or_init(|| Regex::new(r"https?://\S+").unwrap());
    collect_matches(re, text)
}

/// Returns table entries present in `text`, deduplicated, in table order.
pub fn extract_emojis(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    EMOJI_TABLE
        .iter()
        .filter(|emoji| text.contains(*emoji))
        .filter(|emoji| seen.insert(**emoji))
        .map(|emoji| emoji.to_string())
        .collect()
}

/// Number of distinct keywords present, not the number of occurrences.
pub fn count_cta_keywords(text: &str) -> usize {
    let lowercase = text.to_lowercase();
    CTA_KEYWORDS
        .iter()
        .filter(|keyword| lowercase.contains(*keyword))
        .count()
}

pub fn analyze_social_elements(text: &str) -> SocialElements {
    SocialElements {
        hashtags: Occurrences::new(extract_hashtags(text)),
        mentions: Occurrences::new(extract_mentions(text)),
        urls: Occurrences::new(extract_urls(text)),
        emojis: Occurrences::new(extract_emojis(text)),
        question_count: text.matches('?').count(),
        exclamation_count: text.matches('!').count(),
        cta_count: count_cta_keywords(text),
    }
}

fn collect_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
