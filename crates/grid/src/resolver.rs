//! Turns user-supplied text into cell identifiers.
//!
//! Users paste cells in many shapes: canonical strings, decimal 64-bit
//! integers (as some databases export them), comma lists, bracketed or JSON
//! arrays. Parsing is total: anything that cannot be read contributes nothing
//! and never aborts the rest of the input.

use h3o::CellIndex;
use serde_json::Value;
use tracing::trace;

use crate::cell_set::CellSet;
use crate::h3::{cell_from_halves, parse_cell};

/// Nesting limit for bracket/JSON unwrapping. Every step shortens the text,
/// so this only matters for pathological input.
const MAX_DEPTH: usize = 32;

/// Outcome of resolving a batch of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// Unique cells in the order they were first seen.
    pub cells: CellSet,
    /// Tokens that yielded no cell at all.
    pub rejected: Vec<String>,
}

/// Every cell found in `text`, in order, duplicates included.
pub fn parse(text: &str) -> Vec<CellIndex> {
    let mut out = Vec::new();
    parse_into(text, 0, &mut out);
    out
}

/// Parses each token and merges the results into one set.
pub fn resolve<I, S>(tokens: I) -> Resolved
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut resolved = Resolved::default();
    for token in tokens {
        let token = token.as_ref();
        let cells = parse(token);
        if cells.is_empty() {
            if !token.trim().is_empty() {
                resolved.rejected.push(token.trim().to_string());
            }
            continue;
        }
        resolved.cells.extend(cells);
    }
    resolved
}

fn parse_into(text: &str, depth: usize, out: &mut Vec<CellIndex>) {
    let token = text.trim();
    if token.is_empty() || depth > MAX_DEPTH {
        return;
    }

    if let Some(cell) = parse_cell(token) {
        out.push(cell);
        return;
    }

    if let Some(value) = parse_integer(token) {
        let low = (value & 0xffff_ffff) as u32;
        let high = (value >> 32) as u32;
        if let Some(cell) = cell_from_halves(low, high) {
            out.push(cell);
            return;
        }
    }

    if token.contains(',') {
        for piece in token.split(',') {
            parse_into(piece, depth + 1, out);
        }
        return;
    }

    if let Some(rest) = token.strip_prefix('[') {
        parse_into(rest, depth + 1, out);
        return;
    }

    if let Some(rest) = token.strip_suffix(']') {
        parse_into(rest, depth + 1, out);
        return;
    }

    match serde_json::from_str::<Value>(token) {
        Ok(Value::Array(items)) => {
            for item in &items {
                parse_into(&json_to_text(item), depth + 1, out);
            }
        }
        Ok(Value::String(inner)) if inner.trim() != token => {
            parse_into(&inner, depth + 1, out);
        }
        Ok(other) => {
            let text = other.to_string();
            if text != token {
                parse_into(&text, depth + 1, out);
            } else {
                trace!(token, "unparseable cell token");
            }
        }
        Err(_) => trace!(token, "unparseable cell token"),
    }
}

/// Integer literal in the forms `BigInt` accepts: decimal, or `0x`/`0o`/`0b`
/// prefixed. `None` for anything else.
///
/// Values wider than 64 bits are reduced modulo 2^64, the same as splitting
/// them into a low and a 32-bit high half.
fn parse_integer(token: &str) -> Option<u64> {
    let (digits, radix) = match token.get(..2) {
        Some("0x" | "0X") => (&token[2..], 16),
        Some("0o" | "0O") => (&token[2..], 8),
        Some("0b" | "0B") => (&token[2..], 2),
        _ => (token, 10),
    };
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0u64, |acc, ch| {
        let digit = ch.to_digit(radix)?;
        Some(acc.wrapping_mul(u64::from(radix)).wrapping_add(u64::from(digit)))
    })
}

fn json_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_integer, resolve};
    use crate::cell_set::CellSet;
    use h3o::{CellIndex, LatLng, Resolution};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const A: &str = "8a1fb46622dffff";
    const B: &str = "8a1fb46622affff";

    fn c(s: &str) -> CellIndex {
        s.parse().unwrap()
    }

    fn set(cells: Vec<CellIndex>) -> CellSet {
        cells.into_iter().collect()
    }

    #[test]
    fn canonical_string_parses_to_itself() {
        assert_eq!(parse(A), vec![c(A)]);
        assert_eq!(parse("  8a1fb46622dffff \n"), vec![c(A)]);
    }

    #[test]
    fn decimal_integer_is_repacked() {
        let decimal = u64::from(c(A)).to_string();
        assert_eq!(decimal, "622054503267303423");
        assert_eq!(parse(&decimal), vec![c(A)]);
    }

    #[test]
    fn prefixed_integers_are_accepted() {
        assert_eq!(parse("0x8a1fb46622dffff"), vec![c(A)]);
        assert_eq!(parse_integer("0b101"), Some(5));
        assert_eq!(parse_integer("0o17"), Some(15));
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer("-5"), None);
        assert_eq!(parse_integer("1_000"), None);
    }

    #[test]
    fn integers_wider_than_64_bits_wrap() {
        assert_eq!(parse_integer("18446744073709551616"), Some(0));
        assert_eq!(
            parse_integer("99999999999999999999999"),
            Some(200_376_420_520_689_663)
        );
        // The cell plus 2^64 drops back onto the cell.
        assert_eq!(parse("19068798576976855039"), vec![c(A)]);
    }

    #[test]
    fn integers_that_are_not_cells_yield_nothing() {
        assert!(parse("0").is_empty());
        assert!(parse("12345").is_empty());
        assert!(parse("99999999999999999999999").is_empty());
    }

    #[test]
    fn bracketed_list_flattens() {
        let got = set(parse("[8a1fb46622dffff, 8a1fb46622affff]"));
        assert_eq!(got, set(vec![c(A), c(B)]));
    }

    #[test]
    fn comma_list_keeps_order_and_skips_junk() {
        let got = parse("8a1fb46622affff,,nope, 8a1fb46622dffff");
        assert_eq!(got, vec![c(B), c(A)]);
    }

    #[test]
    fn quoted_json_array_flattens() {
        let got = set(parse(r#"["8a1fb46622dffff", "8a1fb46622affff"]"#));
        assert_eq!(got, set(vec![c(A), c(B)]));
    }

    #[test]
    fn json_array_of_decimal_numbers() {
        let text = format!("[{}, {}]", u64::from(c(A)), u64::from(c(B)));
        assert_eq!(set(parse(&text)), set(vec![c(A), c(B)]));
    }

    #[test]
    fn quoted_single_id() {
        assert_eq!(parse(r#""8a1fb46622dffff""#), vec![c(A)]);
    }

    #[test]
    fn nested_brackets_unwrap() {
        assert_eq!(parse("[[[8a1fb46622dffff]]]"), vec![c(A)]);
    }

    #[test]
    fn malformed_input_degrades_to_empty() {
        assert!(parse("not-a-cell").is_empty());
        assert!(parse("[").is_empty());
        assert!(parse("]").is_empty());
        assert!(parse("[[").is_empty());
        assert!(parse("{\"a\": 1}").is_empty());
        assert!(parse("").is_empty());
        assert!(parse(&"[".repeat(10_000)).is_empty());
    }

    #[test]
    fn unmatched_bracket_still_finds_the_cell() {
        assert_eq!(parse("[8a1fb46622dffff"), vec![c(A)]);
        assert_eq!(parse("8a1fb46622dffff]"), vec![c(A)]);
    }

    #[test]
    fn resolve_deduplicates_and_reports_rejects() {
        let resolved = resolve([A, "garbage", " ", B, A, "[8a1fb46622dffff]"]);
        assert_eq!(resolved.cells.to_strings(), vec![A, B]);
        assert_eq!(resolved.rejected, vec!["garbage".to_string()]);
    }

    fn any_cell() -> impl Strategy<Value = CellIndex> {
        (-85.0f64..85.0, -180.0f64..180.0, 0u8..=15).prop_map(|(lat, lon, res)| {
            let resolution = Resolution::try_from(res).unwrap();
            LatLng::new(lat, lon).unwrap().to_cell(resolution)
        })
    }

    proptest! {
        #[test]
        fn any_cell_parses_from_its_canonical_string(cell in any_cell()) {
            prop_assert_eq!(parse(&cell.to_string()), vec![cell]);
            let upper = cell.to_string().to_uppercase();
            prop_assert_eq!(parse(&upper), vec![cell]);
        }

        #[test]
        fn any_cell_parses_from_its_decimal_value(cell in any_cell()) {
            let value = u64::from(cell);
            prop_assert_eq!(parse(&value.to_string()), vec![cell]);
            prop_assert_eq!(parse(&format!("{value:#x}")), vec![cell]);
            let wrapped = u128::from(value) + (1u128 << 64);
            prop_assert_eq!(parse(&wrapped.to_string()), vec![cell]);
        }
    }
}
