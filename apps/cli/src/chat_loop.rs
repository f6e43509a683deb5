use std::io::Write;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use fckty_core::{Workspace, chat::CHAT_GREETING};

fn prompt() -> Result<()> {
    print!("{} ", style("you ›").green().bold());
    std::io::stdout().flush()?;
    Ok(())
}

/// Interactive follow-up chat on stdin. Ends on EOF, `exit` or `quit`.
pub async fn run(workspace: &mut Workspace) -> Result<()> {
    if !workspace.has_chat() {
        println!(
            "{}",
            style("Follow-up chat is unavailable for this analysis.").dim()
        );
        return Ok(());
    }

    println!("{} {}", style("fckty ›").cyan().bold(), CHAT_GREETING);
    println!("{}", style("(type `exit` to quit)").dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        if !line.is_empty() {
            match workspace.send_message(line).await {
                Ok(Some(reply)) => println!("{} {}\n", style("fckty ›").cyan().bold(), reply),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "chat turn failed");
                    eprintln!("{} {}", style("Error:").red().bold(), e);
                }
            }
        }

        prompt()?;
    }

    Ok(())
}
