//! Feed a grammar chunk by chunk and watch states stabilize.
//!
//! Run with: `cargo run --example streaming`

use rill::{Grammar, Status};

fn main() {
    let mut g = Grammar::new();
    let hello = g.literal("Hello");
    let sep = g.literal(", ");
    let world = g.literal("world");
    let bang = g.literal("!");
    let greeting = g.sequence_of([hello, sep, world, bang]);

    let chunks = ["", "Hello", "", ", ", "", "world!"];
    println!("chunks: {chunks:?}");

    for state in g.parse_stream(greeting, chunks) {
        match state.status() {
            Status::Partial => println!(
                "partial  index={:<2} result={:?}",
                state.index(),
                state.result()
            ),
            Status::Complete => println!(
                "complete index={:<2} result={:?}",
                state.index(),
                state.result()
            ),
            Status::Error => println!(
                "error    index={:<2} {}",
                state.index(),
                state.error().expect("error status carries an error")
            ),
        }
    }
}
