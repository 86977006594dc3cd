//! Scripted demo driver
//!
//! Simulates a typing session against the editor core, prints the suggestion
//! list, commits the highlighted candidate, and round-trips the resulting
//! document through the in-memory store.

use clap::Parser;
use crossterm::event::KeyCode;
use varspan::{Editor, MemoryStore, StringStore, VariableCatalog, DOC_KEY};

#[derive(Parser, Debug)]
#[command(
    name = "varspan-demo",
    about = "Simulate a typing session against the variable-token editor"
)]
struct Args {
    /// Characters to type into the editor
    #[arg(long, default_value = "Dear {na")]
    keys: String,
    /// Leave the suggestion session open instead of committing at the end
    #[arg(long)]
    no_commit: bool,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut editor = Editor::new(VariableCatalog::default());
    for c in args.keys.chars() {
        editor.handle_key(KeyCode::Char(c));
    }

    if editor.session().is_open() {
        let anchor = editor.session().anchor();
        println!(
            "session open: query={:?} anchor=({}, {})",
            editor.session().query(),
            anchor.x,
            anchor.y
        );
        for (i, var) in editor.candidates().iter().enumerate() {
            let marker = if i == editor.session().highlighted() {
                ">"
            } else {
                " "
            };
            println!("{marker} {} ({})", var.label, var.id);
        }
        if !args.no_commit {
            editor.handle_key(KeyCode::Enter);
        }
    } else {
        println!("no session open");
    }

    println!("markup: {}", editor.render_markup());

    let mut store = MemoryStore::new();
    if let Err(err) = editor.save_to(&mut store) {
        eprintln!("save failed: {err}");
        std::process::exit(1);
    }
    match editor.load_from(&store) {
        Ok(true) => {
            println!("stored: {}", store.get(DOC_KEY).unwrap_or_default());
        }
        Ok(false) => println!("nothing stored"),
        Err(err) => {
            eprintln!("load failed: {err}");
            std::process::exit(1);
        }
    }
}
