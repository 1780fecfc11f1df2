//! xmlkit CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::ValueType;

#[derive(Parser)]
#[command(name = "xmlkit")]
#[command(version)]
#[command(about = "Read and edit XML documents with typed values", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the typed value of an element's text or attribute
    Get {
        /// XML file to read
        file: PathBuf,

        /// Element path from the root element, e.g. catalog/book/title
        path: String,

        /// Read this attribute instead of the element text
        #[arg(short, long)]
        attr: Option<String>,

        /// Type to read the value as
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::Str)]
        value_type: ValueType,

        /// Value to print when the text or attribute does not exist
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Set an attribute (or the element text) and write the document back
    Set {
        /// XML file to edit
        file: PathBuf,

        /// Element path from the root element
        path: String,

        /// New value
        value: String,

        /// Attribute to set; the element text is set when omitted
        #[arg(short, long)]
        attr: Option<String>,

        /// Check the value against this type and store its canonical form
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::Str)]
        value_type: ValueType,

        /// Write to FILE instead of editing in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an indented outline of the document's nodes
    Dump {
        /// XML file to read
        file: PathBuf,
    },

    /// Re-serialize a document
    Fmt {
        /// XML file to read
        file: PathBuf,

        /// Indent width; compact output when omitted
        #[arg(short, long)]
        indent: Option<usize>,

        /// Write to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmlkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            file,
            path,
            attr,
            value_type,
            default,
        } => commands::get::execute(commands::get::GetArgs {
            file,
            path,
            attr,
            value_type,
            default,
        }),
        Commands::Set {
            file,
            path,
            value,
            attr,
            value_type,
            output,
        } => commands::set::execute(commands::set::SetArgs {
            file,
            path,
            value,
            attr,
            value_type,
            output,
        }),
        Commands::Dump { file } => commands::dump::execute(&file),
        Commands::Fmt {
            file,
            indent,
            output,
        } => commands::fmt::execute(&file, indent, output.as_deref()),
    }
}
