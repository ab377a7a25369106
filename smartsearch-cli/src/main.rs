//! SmartSearch CLI
//!
//! Sends text and file questions to a SmartSearch endpoint (the relay or
//! the service itself) and prints the answer.

use clap::{Parser, Subcommand};
use smartsearch_client::{ClientOptions, SearchClient};
use smartsearch_core::{
    init_logging, LoggingConfig, SearchConfig, SearchError, SearchResponse, UploadFile,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smartsearch")]
#[command(about = "Query the SmartSearch assistant from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL the endpoints hang off, e.g. http://127.0.0.1:8080/api/smartsearch
    #[arg(long)]
    base_url: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a text question
    Ask {
        /// Question to ask
        question: String,
    },

    /// Ask a question about a file
    Upload {
        /// File to attach (image, PDF or office document)
        file: PathBuf,

        /// Prompt describing what to do with the file
        #[arg(short, long)]
        prompt: String,

        /// Override the MIME type detected from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _ = init_logging(&LoggingConfig::default().with_level(level));

    if let Err(e) = run(cli).await {
        eprintln!("{}", user_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SearchError> {
    let mut search = match &cli.config {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    search.apply_env_overrides();

    if let Some(secs) = cli.timeout {
        search.client.request_timeout_secs = secs;
    }
    search.validate()?;

    let mut options = ClientOptions::from_config(&search);
    if let Some(base_url) = cli.base_url {
        options.base_url = base_url;
    }

    let client = SearchClient::new(options)?;

    match cli.command {
        Commands::Ask { question } => {
            let response = client.send_text(&question).await?;
            print_answer(&response);
        }
        Commands::Upload {
            file,
            prompt,
            content_type,
        } => {
            let upload = read_upload(&file, content_type)?;
            let response = client.send_multimodal(&prompt, upload).await?;
            print_answer(&response);
        }
    }

    Ok(())
}

fn read_upload(path: &Path, content_type: Option<String>) -> Result<UploadFile, SearchError> {
    let data = std::fs::read(path)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    Ok(UploadFile::new(file_name, content_type, data))
}

fn print_answer(response: &SearchResponse) {
    println!("{}", response.answer);
    if let Some(source) = &response.source {
        println!("source: {}", source);
    }
    println!("answered in {:.2}s", response.processing_time);
}

/// One human-readable line per failure kind; no stack traces
fn user_message(error: &SearchError) -> String {
    match error {
        SearchError::Validation { message, .. } => format!("invalid request: {}", message),
        SearchError::Timeout { .. } => {
            "the request timed out; the service may be busy, try again later".to_string()
        }
        SearchError::Transport { .. } => {
            "could not reach the SmartSearch service; check your connection and base URL"
                .to_string()
        }
        SearchError::Http { status, .. } => {
            format!("the service returned an error (HTTP {})", status)
        }
        SearchError::Upstream { message } => format!("the service could not answer: {}", message),
        SearchError::Config { message } => format!("configuration error: {}", message),
        SearchError::Io(e) => format!("file error: {}", e),
        SearchError::Serialization(e) => {
            format!("unexpected response from the service: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        use clap::Parser;

        let cli = Cli::parse_from(["smartsearch", "ask", "what are the course hours?"]);
        assert!(matches!(cli.command, Commands::Ask { .. }));
        assert!(!cli.verbose);

        let cli = Cli::parse_from([
            "smartsearch",
            "--base-url",
            "http://localhost:8080/api/smartsearch",
            "upload",
            "report.pdf",
            "--prompt",
            "summarize this",
        ]);
        assert_eq!(
            cli.base_url.as_deref(),
            Some("http://localhost:8080/api/smartsearch")
        );
        match cli.command {
            Commands::Upload { file, prompt, .. } => {
                assert_eq!(file, PathBuf::from("report.pdf"));
                assert_eq!(prompt, "summarize this");
            }
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn error_messages_are_human_readable() {
        let message = user_message(&SearchError::Http {
            status: 500,
            body: "<html>stack trace</html>".to_string(),
        });
        assert!(message.contains("HTTP 500"));
        assert!(!message.contains("<html>"));

        let message = user_message(&SearchError::validation("question must not be empty", None));
        assert!(message.contains("invalid request"));
    }
}
