//! Outcome printing: exactly one JSON object on stdout per invocation.

use softlimit::Outcome;

/// Serializes the outcome to stdout, pretty-printed in debug mode and
/// compact otherwise.
pub fn print_outcome(outcome: &Outcome, debug: bool) {
    let rendered = if debug {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    if let Ok(json) = rendered {
        println!("{json}");
    }
}
