//! Price extraction from free-text pricing cells
//!
//! Cells look like `"$0.10 per 1M input tokens\n$0.70 per 1M output tokens"`
//! or `"$0.65 per 1M tokens"`. Parsing never fails: text without a dollar
//! amount yields `None` for both sides.

use std::sync::LazyLock;

use regex::Regex;

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?|\.\d+)").expect("amount regex must be valid")
});

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(input|output)").expect("label regex must be valid"));

static UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)per\s+(\d[\d,.]*\s*[kmb]?)\s+(?:(?:input|output)\s+)?(tokens?|characters?|images?|requests?|seconds?|minutes?)",
    )
    .expect("unit regex must be valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParsedPrice {
    pub input: Option<f64>,
    pub output: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Input,
    Output,
}

fn side_of(label: &str) -> Side {
    if label.eq_ignore_ascii_case("input") {
        Side::Input
    } else {
        Side::Output
    }
}

/// Label closest to an amount: the first one in the text following it, or the
/// last one in the text preceding it, whichever is nearer. Ties go to the
/// following text.
fn nearest_label(before: &str, after: &str) -> Option<Side> {
    let ahead = LABEL
        .find(after)
        .map(|m| (m.start(), side_of(m.as_str())));
    let behind = LABEL
        .find_iter(before)
        .last()
        .map(|m| (before.len() - m.end(), side_of(m.as_str())));

    match (ahead, behind) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b.1 } else { a.1 }),
        (a, b) => a.or(b).map(|(_, side)| side),
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

pub fn parse_price(text: &str) -> ParsedPrice {
    let matches: Vec<_> = AMOUNT.captures_iter(text).collect();
    let mut amounts: Vec<(f64, Option<Side>)> = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(value) = parse_amount(number.as_str()) else {
            continue;
        };

        // Labels are only searched on the same line, between neighbouring amounts
        let prev_end = if i == 0 {
            0
        } else {
            matches[i - 1].get(0).map_or(0, |m| m.end())
        };
        let next_start = matches
            .get(i + 1)
            .and_then(|c| c.get(0))
            .map_or(text.len(), |m| m.start());

        let before = &text[prev_end..whole.start()];
        let before = before.rsplit('\n').next().unwrap_or(before);
        let after = &text[whole.end()..next_start];
        let after = after.split('\n').next().unwrap_or(after);

        amounts.push((value, nearest_label(before, after)));
    }

    let labelled = |side: Side| {
        amounts
            .iter()
            .find(|(_, s)| *s == Some(side))
            .map(|(v, _)| *v)
    };

    match (labelled(Side::Input), labelled(Side::Output)) {
        (Some(input), Some(output)) => ParsedPrice {
            input: Some(input),
            output: Some(output),
        },
        _ => {
            let single = amounts.first().map(|(v, _)| *v);
            ParsedPrice {
                input: single,
                output: single,
            }
        }
    }
}

/// Unit phrase such as `"per 1M tokens"`, if the text spells one out.
pub fn parse_unit(text: &str) -> Option<String> {
    let caps = UNIT.captures(text)?;
    let quantity: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let noun = caps.get(2)?.as_str().to_lowercase();
    Some(format!("per {quantity} {noun}"))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn input_output_lines() {
        let parsed = parse_price("$0.10 per 1M input tokens\n$0.70 per 1M output tokens");
        assert_eq!(parsed.input, Some(0.10));
        assert_eq!(parsed.output, Some(0.70));
    }

    #[test]
    fn single_price_is_symmetric() {
        let parsed = parse_price("$0.65 per 1M tokens");
        assert_eq!(parsed.input, Some(0.65));
        assert_eq!(parsed.output, Some(0.65));
    }

    #[test]
    fn no_amount_yields_none() {
        assert_eq!(parse_price("Contact sales for pricing"), ParsedPrice::default());
        assert_eq!(parse_price(""), ParsedPrice::default());
    }

    #[test]
    fn output_listed_first() {
        let parsed = parse_price("$2.00 per 1M output tokens\n$0.25 per 1M input tokens");
        assert_eq!(parsed.input, Some(0.25));
        assert_eq!(parsed.output, Some(2.00));
    }

    #[test]
    fn labels_before_amounts_on_one_line() {
        let parsed = parse_price("Input: $0.10 / Output: $0.40 per 1M tokens");
        assert_eq!(parsed.input, Some(0.10));
        assert_eq!(parsed.output, Some(0.40));
    }

    #[test]
    fn labels_after_amounts_on_one_line() {
        let parsed = parse_price("$0.10 per 1M input tokens, $0.70 per 1M output tokens");
        assert_eq!(parsed.input, Some(0.10));
        assert_eq!(parsed.output, Some(0.70));
    }

    #[test]
    fn only_input_label_falls_back_to_first_amount() {
        let parsed = parse_price("$0.30 per 1M input tokens");
        assert_eq!(parsed.input, Some(0.30));
        assert_eq!(parsed.output, Some(0.30));
    }

    #[test]
    fn thousands_separator() {
        let parsed = parse_price("$1,250.00 per 1M tokens");
        assert_eq!(parsed.input, Some(1250.0));
    }

    #[test]
    fn amount_without_leading_zero() {
        let parsed = parse_price("$.50 per 1M tokens");
        assert_eq!(parsed.input, Some(0.5));
        assert_eq!(parsed.output, Some(0.5));

        let parsed = parse_price("$.05 per 1M input tokens\n$.40 per 1M output tokens");
        assert_eq!(parsed.input, Some(0.05));
        assert_eq!(parsed.output, Some(0.4));
    }

    #[test]
    fn unit_extraction() {
        assert_eq!(
            parse_unit("$0.10 per 1M input tokens").as_deref(),
            Some("per 1M tokens")
        );
        assert_eq!(
            parse_unit("$0.02 per 1k images").as_deref(),
            Some("per 1K images")
        );
        assert_eq!(parse_unit("Contact sales"), None);
    }
}
