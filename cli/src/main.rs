use clap::Parser;
use config::load_env_file;
use conversation::{Gate, Mode, Session};
use llm::providers::gemini::{GeminiChatModel, GeminiProvider};
use llm::{ModelProvider, Role};

use clap_derive::Parser;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model id, fixed for the whole run
    #[arg(long, default_value = config::DEFAULT_MODEL_ID)]
    model: String,

    #[arg(long, short)]
    tracing: bool,

    /// Custom base URL for Gemini API (e.g., for proxy)
    #[arg(long, env = "GEMINI_BASE_URL")]
    gemini_url: Option<String>,
}

// Application state
struct AppState {
    session: Session,
    mode: Mode,
    model: GeminiChatModel,
    model_display: String,
}

fn setup_tracing(enable: bool) {
    if enable {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .with_writer(|| std::io::sink())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::GeneralChat => "General chat",
        Mode::DocumentChat => "Rules chat",
    }
}

fn print_status_bar(mode: Mode, model_name: &str) {
    let terminal_width: usize = 80;
    let status = format!(" {} • {} ", mode_label(mode), model_name);
    let padding = terminal_width.saturating_sub(status.len());
    let left_pad = padding / 2;
    let right_pad = padding - left_pad;

    println!("┌{}┐", "─".repeat(terminal_width - 2));
    println!("│{}{}{}│", " ".repeat(left_pad), status, " ".repeat(right_pad));
    println!("└{}┘", "─".repeat(terminal_width - 2));
}

/// Render the transcript of the current mode. Priming messages are hidden.
fn display_history(state: &AppState) {
    for message in state.session.history(state.mode).visible() {
        let speaker = match message.role {
            Role::User => "you",
            _ => "assistant",
        };
        println!("{}: {}", speaker, message.content);
    }
}

fn prompt_api_key() -> anyhow::Result<String> {
    println!("No GEMINI_API_KEY or GOOGLE_API_KEY found in the environment.");
    print!("Enter your Gemini API key: ");
    io::stdout().flush()?;

    let mut key = String::new();
    io::stdin().read_line(&mut key)?;
    Ok(key.trim().to_string())
}

// Slash command parsing and handling
mod commands {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    pub enum Command {
        Quit,
        Help,
        Reset,
        SwitchMode(Mode),
        Upload(PathBuf),
    }

    pub enum CommandResult {
        Continue,
        Exit,
    }

    struct ParsedMode(Mode);

    impl FromStr for ParsedMode {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "chat" | "general" => Ok(ParsedMode(Mode::GeneralChat)),
                "pdf" | "rules" | "document" => Ok(ParsedMode(Mode::DocumentChat)),
                other => Err(format!("Unknown mode: {}. Available: chat, pdf", other)),
            }
        }
    }

    impl Command {
        pub fn parse(input: &str) -> Result<Self, String> {
            if !input.starts_with('/') {
                return Err("Not a command".to_string());
            }

            let parts: Vec<&str> = input[1..].split_whitespace().collect();
            if parts.is_empty() {
                return Err("Empty command".to_string());
            }

            match parts[0] {
                "quit" | "exit" => Ok(Command::Quit),
                "help" => Ok(Command::Help),
                "reset" => Ok(Command::Reset),
                "mode" => {
                    if parts.len() < 2 {
                        return Err("Usage: /mode <chat|pdf>".to_string());
                    }
                    parts[1].parse::<ParsedMode>().map(|m| Command::SwitchMode(m.0))
                }
                "upload" => {
                    if parts.len() < 2 {
                        return Err("Usage: /upload <path-to-pdf>".to_string());
                    }
                    // Paths may contain spaces; take the rest of the line.
                    let path = input[1..]
                        .trim_start_matches("upload")
                        .trim()
                        .to_string();
                    Ok(Command::Upload(PathBuf::from(path)))
                }
                _ => Err(format!(
                    "Unknown command: /{}. Type /help for available commands.",
                    parts[0]
                )),
            }
        }

        pub fn execute(self, state: &mut AppState) -> CommandResult {
            match self {
                Command::Quit => {
                    println!("Goodbye!");
                    CommandResult::Exit
                }
                Command::Help => {
                    print_help();
                    println!();
                    CommandResult::Continue
                }
                Command::Reset => {
                    state.session.reset_all();
                    println!("Session reset: histories cleared, rules document dropped.");
                    println!();
                    CommandResult::Continue
                }
                Command::SwitchMode(mode) => {
                    state.mode = mode;
                    println!("Switched to {}.", mode_label(mode));
                    display_history(state);
                    println!();
                    CommandResult::Continue
                }
                Command::Upload(path) => {
                    match fs::read(&path) {
                        Ok(bytes) => match state.session.ingest_document(&bytes) {
                            Ok(()) => {
                                println!("Rules loaded from {}.", path.display());
                                println!("Ask away in rules chat (/mode pdf).");
                            }
                            Err(e) => eprintln!("{}", e),
                        },
                        Err(e) => eprintln!("Could not read {}: {}", path.display(), e),
                    }
                    println!();
                    CommandResult::Continue
                }
            }
        }
    }

    fn print_help() {
        println!("Available commands:");
        println!("  /mode <chat|pdf>       - Switch between general chat and rules chat");
        println!("  /upload <path>         - Load a rules PDF for rules chat");
        println!("  /reset                 - Start a new session (clears both histories)");
        println!("  /quit, /exit           - Exit the chat");
        println!("  /help                  - Show this help message");
        println!("  Ctrl+D                 - Exit the chat");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_file();
    let args = Args::parse();

    setup_tracing(args.tracing);

    let api_key = match config::api_key_from_env() {
        Some(key) => key,
        None => prompt_api_key()?,
    };
    if api_key.is_empty() {
        anyhow::bail!("An API key is required to start.");
    }

    let provider = match &args.gemini_url {
        Some(url) => GeminiProvider::new(url, &api_key)?,
        None => GeminiProvider::default(&api_key)?,
    };
    let model = provider.create_chat_model(&args.model);

    let model_display = if args.model == config::DEFAULT_MODEL_ID {
        config::DEFAULT_MODEL_DISPLAY.to_string()
    } else {
        args.model.clone()
    };

    let mut state = AppState {
        session: Session::new(),
        mode: Mode::GeneralChat,
        model,
        model_display,
    };

    println!();
    println!("Your board game assistant. Type /help for commands, Ctrl+D or /quit to exit.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_status_bar(state.mode, &state.model_display);
        if state.session.gate(state.mode) == Gate::AwaitingDocument {
            println!("Rules chat needs a rules PDF. Upload one with /upload <path>.");
        }
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => {
                println!();
                println!("Goodbye!");
                break;
            }
        };

        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        // Try to parse as command
        if input.starts_with('/') {
            match commands::Command::parse(input) {
                Ok(cmd) => match cmd.execute(&mut state) {
                    commands::CommandResult::Exit => break,
                    commands::CommandResult::Continue => continue,
                },
                Err(err) => {
                    println!("{}", err);
                    println!();
                    continue;
                }
            }
        }

        // Chat input is blocked, not an error, while rules chat waits for a
        // document.
        if state.session.gate(state.mode) == Gate::AwaitingDocument {
            println!("Upload a rules PDF first: /upload <path>");
            println!();
            continue;
        }

        // Regular message
        match state.session.send(state.mode, input, &state.model).await {
            Ok(reply) => println!("{}", reply.content),
            Err(e) => eprintln!("Error: {}", e),
        }

        println!();
    }

    println!(
        "Conversation had {} messages",
        state.session.history(state.mode).len()
    );
    Ok(())
}
