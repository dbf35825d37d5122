use clap::Parser;

use freecellar::{deal, display, format_deck};

#[derive(Debug, Parser)]
#[command(name = "deal", about = "Deal a reproducible Freecell deck")]
struct Args {
    /// Deal seed; equal seeds produce equal decks
    #[arg(long, default_value_t = 2)]
    seed: u64,

    /// Also print the readable layout
    #[arg(long)]
    readable: bool,
}

fn main() {
    let args = Args::parse();
    let layout = deal(args.seed);
    println!("{}", format_deck(&layout));
    if args.readable {
        print!("{}", display::render_deck(&layout));
    }
}
