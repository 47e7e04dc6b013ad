use crate::dom::Direction;
use regex::Regex;
use std::sync::LazyLock;

/// The Yen sign searched for in page text
pub const YEN_SYMBOL: char = '¥';

// Whitespace includes NBSP (U+00A0) and narrow NBSP (U+202F), which price
// widgets use between the sign and the number.
const WS: &str = r"[\s\u{00A0}\u{202F}]";
const NON_WS: &str = r"[^\s\u{00A0}\u{202F}]";
const AMOUNT: &str = r"([0-9][0-9\s\u{00A0}\u{202F},]*(?:\.[0-9]+)?)";

struct Patterns {
    boundary: Regex,
    amount: Regex,
}

fn compile(boundary: String, amount: String) -> Patterns {
    Patterns {
        boundary: Regex::new(&boundary).expect("boundary pattern is valid"),
        amount: Regex::new(&amount).expect("amount pattern is valid"),
    }
}

static FORWARD: LazyLock<Patterns> = LazyLock::new(|| {
    compile(
        format!("{YEN_SYMBOL}{WS}*{NON_WS}"),
        format!("{YEN_SYMBOL}{WS}*{AMOUNT}"),
    )
});

static BACKWARD: LazyLock<Patterns> = LazyLock::new(|| {
    compile(
        format!("{NON_WS}{WS}*{YEN_SYMBOL}"),
        format!("{AMOUNT}{WS}*{YEN_SYMBOL}"),
    )
});

/// Classification of a window's text
#[derive(Debug, Clone, PartialEq)]
pub enum TokenMatch {
    /// Symbol with an adjacent number; carries the parsed Yen amount
    Amount(f64),
    /// Number that runs to the end of the text and ends in a grouping comma,
    /// so its remaining digits may follow in the next node
    Unfinished(f64),
    /// Something other than a number sits next to the symbol
    NotAnAmount,
    /// Symbol not reached yet, or nothing next to it so far
    Incomplete,
}

/// Classify `text` for a search in `direction`
///
/// Forward searches look for `¥ 1,234`, backward searches for `1,234 ¥`.
pub fn match_window(text: &str, direction: Direction) -> TokenMatch {
    let patterns = match direction {
        Direction::Forward => &*FORWARD,
        Direction::Backward => &*BACKWARD,
    };

    if let Some(literal) = patterns.amount.captures(text).and_then(|c| c.get(1)) {
        if let Some(amount) = parse_amount(literal.as_str()) {
            let open_ended = direction == Direction::Forward
                && literal.end() == text.len()
                && literal.as_str().trim_end().ends_with(',');
            return if open_ended {
                TokenMatch::Unfinished(amount)
            } else {
                TokenMatch::Amount(amount)
            };
        }
    }
    if patterns.boundary.is_match(text) {
        return TokenMatch::NotAnAmount;
    }
    TokenMatch::Incomplete
}

/// Parse a matched literal such as `12 345` or `1,234.50`
///
/// Whitespace and commas are grouping separators and are dropped. Literals
/// too long for a finite `f64` are rejected.
pub fn parse_amount(literal: &str) -> Option<f64> {
    let digits: String = literal
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    digits.parse::<f64>().ok().filter(|amount| amount.is_finite())
}
