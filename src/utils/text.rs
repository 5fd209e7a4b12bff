// Text normalization applied before cache key derivation
// Author: kelexine (https://github.com/kelexine)

use regex::Regex;
use std::sync::OnceLock;

static MARKUP: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn markup() -> &'static Regex {
    // Tags such as <w:t>, <p class="x">, </span>, <br/>
    MARKUP.get_or_init(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("static markup regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace regex"))
}

/// Normalize contract or clause text so cosmetically different copies of the
/// same wording map to one cache key.
///
/// Strips markup tags, decodes the handful of entities word processors emit,
/// collapses runs of whitespace (including non-breaking spaces) and trims.
/// Case is preserved: "Buyer" and "buyer" can carry different meaning.
pub fn normalize(input: &str) -> String {
    let stripped = markup().replace_all(input, " ");
    let decoded = decode_entities(&stripped).replace('\u{a0}', " ");
    whitespace().replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        // Last, so "&amp;lt;" decodes to "&lt;" and not "<"
        .replace("&amp;", "&")
}
