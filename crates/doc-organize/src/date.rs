//! Date templates for `<currentDate>` slots
//!
//! A template is free text with bracketed tokens, e.g.
//! `[ww], [mmmm] [ddd], [yyyy]` → `Monday, October 19th, 2026`.
//!
//! | token    | meaning                      |
//! |----------|------------------------------|
//! | `[mmmm]` | long month (`October`)       |
//! | `[mmm]`  | short month (`Oct`)          |
//! | `[mm]`   | zero-padded month (`09`)     |
//! | `[ww]`   | long weekday (`Monday`)      |
//! | `[w]`    | short weekday (`Mon`)        |
//! | `[ddd]`  | day with ordinal (`19th`)    |
//! | `[dd]`   | zero-padded day (`09`)       |
//! | `[d]`    | day (`9`)                    |
//! | `[yyyy]` | 4-digit year                 |
//! | `[yy]`   | 2-digit year                 |
//! | `[hh]`   | 24-hour hour, zero-padded    |
//! | `[h]`    | 12-hour hour                 |
//! | `[nn]`   | minute, zero-padded          |
//! | `[ss]`   | second, zero-padded          |
//! | `[ampm]` | `am` / `pm`                  |
//!
//! Unknown tokens are copied through unchanged.

use chrono::{Datelike, NaiveDateTime, Timelike};

pub const STOCK_FORMAT_A: &str = "[ww], [mmmm] [ddd], [yyyy]";
pub const STOCK_FORMAT_B: &str = "[mm]/[dd]/[yyyy]";

/// Render `template` for the given moment
pub fn format_date(template: &str, when: &NaiveDateTime) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let token = &after[..close];
        match expand_token(token, when) {
            Some(text) => out.push_str(&text),
            None => {
                out.push('[');
                out.push_str(token);
                out.push(']');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn expand_token(token: &str, when: &NaiveDateTime) -> Option<String> {
    let text = match token {
        "mmmm" => when.format("%B").to_string(),
        "mmm" => when.format("%b").to_string(),
        "mm" => format!("{:02}", when.month()),
        "ww" => when.format("%A").to_string(),
        "w" => when.format("%a").to_string(),
        "ddd" => format!("{}{}", when.day(), ordinal_suffix(when.day())),
        "dd" => format!("{:02}", when.day()),
        "d" => when.day().to_string(),
        "yyyy" => format!("{:04}", when.year()),
        "yy" => format!("{:02}", when.year().rem_euclid(100)),
        "hh" => format!("{:02}", when.hour()),
        "h" => when.hour12().1.to_string(),
        "nn" => format!("{:02}", when.minute()),
        "ss" => format!("{:02}", when.second()),
        "ampm" => (if when.hour12().0 { "pm" } else { "am" }).to_string(),
        _ => return None,
    };
    Some(text)
}

/// English ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
