//! Interactive terminal client for the chat service.
//!
//! Speaks both transports: a `ws://` endpoint streams the answer chunk by
//! chunk, an `http://` endpoint does a single POST. The client owns the
//! bounded conversation history and records a pair only after a successful
//! answer.

use std::io::{self, BufRead, Write};

use clap::Parser;
use colored::Colorize;

use chat_core::history::{self, HistoryEntry};

mod network;

#[derive(Parser, Debug)]
#[command(name = "chat-cli", about = "Interactive client for the RAG chat service")]
struct Args {
    /// Chat endpoint; ws(s):// streams chunks, http(s):// posts once.
    #[arg(long)]
    endpoint: String,

    /// Enable retrieval-augmented answers.
    #[arg(long)]
    rag: bool,

    /// Number of query/response pairs sent as conversation history.
    #[arg(long, default_value_t = 5)]
    history: usize,
}

fn agent_tag() -> colored::ColoredString {
    "Agent:".green()
}

fn user_tag() -> colored::ColoredString {
    "You:".cyan()
}

/// Sends one prompt and prints the answer as it arrives.
async fn chat(args: &Args, prompt: &str, history: &[HistoryEntry]) -> anyhow::Result<String> {
    print!("{} ", agent_tag());
    io::stdout().flush()?;

    let answer = if args.endpoint.starts_with("ws") {
        network::websocket_request(&args.endpoint, prompt, args.rag, history, |chunk| {
            print!("{chunk}");
            let _ = io::stdout().flush();
        })
        .await?
    } else {
        let answer = network::http_request(&args.endpoint, prompt, args.rag, history).await?;
        print!("{answer}");
        answer
    };

    println!("\n");
    Ok(answer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let banner = "Chat CLI (type 'exit' to quit)";
    println!("\t\t{}", "-".repeat(banner.len()));
    println!("\t\t{banner}");
    println!("\t\t{}\n", "-".repeat(banner.len()));

    println!("{} Hello, how may I assist you?\n", agent_tag());

    let mut retained: Vec<HistoryEntry> = Vec::new();
    let stdin = io::stdin();

    loop {
        print!("{} ", user_tag());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") {
            println!("Exiting chat client.");
            break;
        }

        let snapshot = history::clamp(&retained, args.history).to_vec();

        match chat(&args, prompt, &snapshot).await {
            Ok(answer) => {
                if args.history > 0 {
                    history::push_exchange(&mut retained, prompt, &answer);
                }
            }
            Err(err) => {
                println!(
                    "{}",
                    format!("Error while communicating with the chat service: {err}").red()
                );
            }
        }
    }

    Ok(())
}
