use clap::{Parser, Subcommand};

/// `gsmcheck` - conversational paper-weight validation for printed books.
#[derive(Parser, Debug)]
#[command(name = "gsmcheck")]
#[command(version)]
#[command(about = "Check the declared GSM of a book against its measured weight.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway serving the chat API
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Validate one book offline, without a language model
    Validate {
        /// Length of the book in centimeters
        #[arg(long)]
        length: f64,

        /// Breadth of the book in centimeters
        #[arg(long)]
        breadth: f64,

        /// Number of printed text pages
        #[arg(long)]
        text_pages: u32,

        /// GSM of the text paper
        #[arg(long)]
        text_gsm: f64,

        /// GSM of the cover paper
        #[arg(long)]
        cover_gsm: f64,

        /// Measured weight of the book in grams
        #[arg(long)]
        measured_weight: f64,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Output language (en, fr)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Collect the six values in the terminal, one question at a time
    Interactive {
        /// Dialogue language (en, fr)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Print the system prompt sent to the model
    Prompt {
        /// Prompt language (en, fr)
        #[arg(short, long)]
        language: Option<String>,
    },
}
