//! Text parsing of model output.
//!
//! Every workflow reads the model's free-form answer through [`ResponseParser`],
//! so moving to structured model output only means swapping the parser.

use crate::domain::model::{KeywordList, MessageSequence, ValidationVerdict, MAX_FUNNEL_MESSAGES};
use regex::Regex;
use std::sync::OnceLock;

/// 模型判定描述合格時回覆的固定字串
pub const ACCEPTANCE_TOKEN: &str = "OK";

pub trait ResponseParser: Send + Sync {
    fn keywords(&self, raw: &str) -> KeywordList;
    fn messages(&self, raw: &str) -> MessageSequence;
    fn verdict(&self, raw: &str) -> ValidationVerdict;
}

/// Line- and label-based parsing of plain text answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl ResponseParser for PlainTextParser {
    fn keywords(&self, raw: &str) -> KeywordList {
        extract_keywords(raw)
    }

    fn messages(&self, raw: &str) -> MessageSequence {
        extract_messages(raw)
    }

    fn verdict(&self, raw: &str) -> ValidationVerdict {
        parse_verdict(raw)
    }
}

/// 依行切分，去除空白行，保留原順序。
/// 前言或結語也會被當成關鍵字，這裡不做語意過濾。
pub fn extract_keywords(raw: &str) -> KeywordList {
    KeywordList::new(
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn message_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"Message [0-9]:").expect("message marker pattern is valid"))
}

/// Splits `Message <n>: <body>` blocks. Each body runs up to the next marker or
/// the end of the text; anything before the first marker is ignored.
pub fn extract_messages(raw: &str) -> MessageSequence {
    let messages = message_marker()
        .find_iter(raw)
        .take(MAX_FUNNEL_MESSAGES)
        .map(|marker| {
            let body_end = message_marker()
                .find_at(raw, marker.end())
                .map_or(raw.len(), |next| next.start());
            raw[marker.end()..body_end].trim().to_string()
        })
        .collect();

    MessageSequence::new(messages)
}

/// 完全相符（區分大小寫）才算通過，其餘整段文字都視為建議
pub fn parse_verdict(raw: &str) -> ValidationVerdict {
    let trimmed = raw.trim();
    if trimmed == ACCEPTANCE_TOKEN {
        ValidationVerdict::Accepted
    } else {
        ValidationVerdict::Suggestion(trimmed.to_string())
    }
}
