//! Reads HTML from stdin and prints the extraction result as JSON.
//!
//! With `--action`, a successful extraction is turned into the model
//! request body for that action instead. Add `--send` to call the model and
//! print the query service reply, or `--endpoint` to ask a running query
//! service the way the popup does.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use docmind_extract::popup::{ServiceClient, Session, State};
use docmind_extract::query::{
    self, Action, MessagesRequest, ModelClient, ModelConfig, QueryError, QueryReply, QueryRequest,
};
use docmind_extract::{extract_with_options, ExtractionResult, HtmlPage, Options};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "extract_stdin", about = "Extract readable page text from HTML on stdin")]
struct Args {
    /// URL the page was loaded from (used for PDF detection)
    #[arg(long)]
    url: Option<String>,

    /// Content-Type reported for the page; its charset drives decoding
    #[arg(long)]
    content_type: Option<String>,

    /// Character budget for the extracted text
    #[arg(long, default_value_t = docmind_extract::MAX_CHARS)]
    max_chars: usize,

    /// Minimum characters for a page to count as extractable
    #[arg(long, default_value_t = docmind_extract::MIN_CHARS)]
    min_chars: usize,

    /// Print the model request body for this action instead of the result
    #[arg(long, value_parser = parse_action)]
    action: Option<Action>,

    /// Question for the `ask` action
    #[arg(long)]
    question: Option<String>,

    /// Send the request to the model and print the reply (needs ANTHROPIC_API_KEY)
    #[arg(long, requires = "action", conflicts_with = "endpoint")]
    send: bool,

    /// Ask this query service instead of calling the model directly
    #[arg(long, requires = "action")]
    endpoint: Option<String>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn parse_action(raw: &str) -> Result<Action, String> {
    raw.parse().map_err(|e: query::UnknownAction| e.to_string())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let mut html = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut html) {
        tracing::error!(error = %err, "failed to read stdin");
        return print_json(&ExtractionResult::inaccessible(), args.pretty);
    }

    let mut page = HtmlPage::from_bytes(&html, args.content_type.as_deref());
    if let Some(url) = &args.url {
        page = page.with_url(url);
    }

    let options = Options {
        max_chars: args.max_chars,
        min_chars: args.min_chars,
        ..Options::default()
    };
    let result = extract_with_options(&page, &options);

    let Some(action) = args.action else {
        return print_json(&result, args.pretty);
    };
    if !result.is_success() {
        return print_json(&result, args.pretty);
    }

    if let Some(endpoint) = &args.endpoint {
        let client = ServiceClient::new(endpoint.as_str());
        let mut session = Session::new();
        session.finish_extraction(&result);
        let reply = match session.run_action(&client, action, args.question).await {
            State::Success { answer, .. } => QueryReply::Answer {
                answer: answer.clone(),
            },
            State::Error(failure) => QueryReply::Error(QueryError::new(failure.error)),
            other => {
                tracing::error!(state = other.name(), "query did not complete");
                return ExitCode::FAILURE;
            }
        };
        return print_json(&reply, args.pretty);
    }

    let mut request = QueryRequest::new(result.text(), action);
    request.question = args.question;

    if args.send {
        let reply = match ModelClient::from_env() {
            Ok(client) => client.answer(&request).await,
            Err(err) => QueryReply::Error(err),
        };
        return print_json(&reply, args.pretty);
    }

    let prepared = match query::prepare(&request) {
        Ok(prepared) => prepared,
        Err(err) => return print_json(&err, args.pretty),
    };

    // Nothing is sent, so a missing key only matters to the caller that will.
    let config = ModelConfig::from_env().unwrap_or_else(|_| ModelConfig::new(""));
    print_json(&MessagesRequest::new(&config, &prepared), args.pretty)
}
