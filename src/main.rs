use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    parley::apps::run_analyzer(std::env::args().skip(1), io::stdin().lock(), io::stdout().lock())
}
