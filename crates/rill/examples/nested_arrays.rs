//! A self-referential grammar: nested array literals via a deferred node.
//!
//! Run with: `cargo run --example nested_arrays`

use rill::{CharSet, Grammar};

fn main() {
    // value = "[" value "]" | digit
    let mut g = Grammar::new();
    let value = g.lazy();
    let open = g.literal("[");
    let close = g.literal("]");
    let digit = g.char_from(CharSet::digits());
    let bracketed = g.sequence_of([open, value, close]);
    let body = g.one_of([bracketed, digit]);
    g.define(value, body).expect("value is deferred and unbound");

    for input in ["3", "[3]", "[[3]]", "[[x]]"] {
        let state = g.parse_string(value, input);
        match state.error() {
            None => println!("{input:>7} -> {:?}", state.result()),
            Some(error) => println!("{input:>7} -> {error}"),
        }
    }
}
