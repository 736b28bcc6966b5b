use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio portfolio rendering server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Folio HTTP service.
    Serve(Box<ServeArgs>),
    /// Render a serialized document from disk and print the result.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: RenderOverrides,

    /// Print dispatcher output before sanitising and augmentation.
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "json")]
    pub raw: bool,

    /// Print the full render output (html, outline, metrics) as JSON.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Path to the serialized document JSON.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Run the HTML sanitiser over rendered documents.
    #[arg(
        long = "render-sanitize",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sanitize: Option<bool>,

    /// Frame height in pixels for embeds without an explicit height.
    #[arg(long = "render-embed-default-height", value_name = "PIXELS")]
    pub embed_default_height: Option<u32>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub render: RenderOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Maximum accepted request body size in bytes.
    #[arg(long = "server-max-body-bytes", value_name = "BYTES")]
    pub server_max_body_bytes: Option<u64>,

    /// Seconds to wait for in-flight requests on shutdown.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the log level filter (e.g. info, debug).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Maximum characters accepted in a contact message.
    #[arg(long = "contact-message-max-chars", value_name = "CHARS")]
    pub contact_message_max_chars: Option<u64>,

    /// Number of contact submissions retained in the in-memory inbox.
    #[arg(long = "contact-inbox-capacity", value_name = "COUNT")]
    pub contact_inbox_capacity: Option<u64>,
}
