use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "snippet-client - browse and create code snippets",
    long_about = "snippet-client lists, filters and creates code snippets stored by a remote \
                  snippet service. Run without a subcommand to open the interactive view."
)]
pub struct SnippetCli {
    #[clap(
        long,
        global = true,
        help = "Base URL of the snippet service (falls back to $SNIPPET_API_BASE)"
    )]
    pub base_url: Option<String>,

    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List snippets, optionally filtered by language
    List {
        #[clap(long, short, help = "Only show snippets in this language")]
        lang: Option<String>,

        #[clap(long, short = 'n', help = "Maximum number of snippets to fetch")]
        limit: Option<u32>,
    },
    /// Create a new snippet
    Add {
        #[clap(long, short, help = "Snippet title")]
        title: String,

        #[clap(long, short, help = "Language of the code")]
        language: String,

        #[clap(long, short, help = "The code body")]
        code: String,

        #[clap(long, short, help = "Optional description")]
        description: Option<String>,

        #[clap(long, short = 'g', help = "Comma-separated tags")]
        tags: Option<String>,
    },
}
