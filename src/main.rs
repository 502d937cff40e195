use finchat::assembler::AssemblerEvent;
use finchat::chat::ChatController;
use finchat::cli::{parse_args, run_cli_command, CliCommand, QUICK_PROMPTS};
use finchat::config::ChatConfig;
use finchat::error::ChatError;
use finchat::models::GREETING;
use finchat::traits::HttpClient;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());
    if let Some(text) = run_cli_command(&command) {
        println!("{}", text);
        return Ok(());
    }

    color_eyre::install()?;

    // Logs go to stderr so stdout carries only the answer
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "finchat=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ChatConfig::from_env()?;
    info!("Using chat endpoint {}", config.chat_url);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut controller = ChatController::new(config);
        match command {
            CliCommand::Ask(prompt) => ask(&mut controller, &prompt).await.map_err(|e| {
                eyre!("{} ({})", e.user_message(), e.error_code())
            }),
            _ => repl(&mut controller).await,
        }
    })
}

/// Send one prompt, printing the answer as it streams. Ctrl-C stops it.
async fn ask<H: HttpClient>(
    controller: &mut ChatController<H>,
    prompt: &str,
) -> Result<(), ChatError> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Ctrl-C received, cancelling stream");
                cancel.cancel();
            }
        })
    };

    let mut stdout = std::io::stdout();
    let result = controller
        .send(prompt, cancel, |event| {
            if let AssemblerEvent::Delta { text, .. } = event {
                let _ = write!(stdout, "{}", text);
                let _ = stdout.flush();
            }
        })
        .await;
    watcher.abort();

    println!();
    result.map(|_| ())
}

/// Read prompts from stdin, one per line, until EOF.
async fn repl<H: HttpClient>(controller: &mut ChatController<H>) -> Result<()> {
    println!("{}\n", GREETING);
    eprintln!("Try one of:");
    for prompt in QUICK_PROMPTS {
        eprintln!("  {}", prompt);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        let _ = std::io::stderr().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match ask(controller, &line).await {
            Ok(()) => {
                if let Some(reply) = controller.conversation().last() {
                    eprintln!("[{}]", reply.time_label());
                }
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                debug!("Chat turn failed: {} ({})", e, e.error_code());
            }
        }
        println!();
    }
    Ok(())
}
