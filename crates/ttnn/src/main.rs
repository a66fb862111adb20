//! `ttnn-cli` entry point -- argument parsing and all behavior live in
//! `ttnn::cli`; this is just the process boundary.

fn main() {
    std::process::exit(ttnn::cli::run());
}
