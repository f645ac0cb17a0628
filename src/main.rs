//! VCS log importer.
//!
//! Binary crate entry point. All CLI logic is in the `cli` module.

// mimalloc returns freed pages to the OS; large logs allocate many short strings.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod cli;

fn main() {
    cli::run();
}
