use clap::Parser;
use snippet_client::{handle_command, init_logging, SnippetCli};
use std::process;

fn main() {
    let cli = SnippetCli::parse();

    if let Err(e) = init_logging() {
        eprintln!("{}", e);
    }

    // One thread: UI events and network completions are handled in turn.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(handle_command(cli)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
