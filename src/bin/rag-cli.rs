use std::io::Write;

use clap::Parser;
use futures_util::StreamExt;
use serde_json::json;

use rag_proxy::search::AiSearchResponse;

#[derive(Parser)]
#[command(name = "rag-cli")]
#[command(about = "Ask a running rag-proxy a question", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    /// Wait for the complete answer instead of streaming it.
    #[arg(long)]
    no_stream: bool,

    /// The question to ask.
    query: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .post(&cli.url)
        .json(&json!({ "query": cli.query, "stream": !cli.no_stream }))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if cli.no_stream {
        print_answer(res.json().await?);
    } else {
        let mut stdout = std::io::stdout();
        let mut stream = res.bytes_stream();
        while let Some(chunk) = stream.next().await {
            stdout.write_all(&chunk?)?;
            stdout.flush()?;
        }
        println!();
    }

    Ok(())
}

fn print_answer(answer: AiSearchResponse) {
    println!("{}", answer.response);

    if answer.data.is_empty() {
        return;
    }
    println!();
    println!("Sources:");
    for item in &answer.data {
        println!("  {:.3}  {}", item.score, item.filename);
    }
    if answer.has_more {
        println!("  (more results available)");
    }
}
