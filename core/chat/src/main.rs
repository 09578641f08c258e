mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::process;
use common::domain::ModelName;
use common::error::Error;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use cli::repl::{missing_key_hint, Repl};
use cli::view::{format_chat_list, format_history, StreamPrinter};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::{ChatCommand, StreamOutcome};
use ports::inbound::UseCaseRunner;
use usecase::SettingsUpdate;
use wiring::{wire_chat, App};

/// 一発送信を Ctrl+C で止めたときの終了コード
const EXIT_CANCELLED: i32 = 130;

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config)?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                Some(m)
            },
        });

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command finished".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("command".to_string(), serde_json::json!(command_name));
                m.insert("exit_code".to_string(), serde_json::json!(code));
                Some(m)
            },
        });
        if let Err(ref e) = result {
            let _ = self.app.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("cli".to_string()),
                kind: Some("error".to_string()),
                fields: None,
            });
        }
        result
    }
}

impl Runner {
    fn dispatch(&self, cmd: ChatCommand) -> Result<i32, Error> {
        match cmd {
            ChatCommand::Help => {
                print_help();
                Ok(0)
            }
            ChatCommand::ListModels => {
                let settings = self.app.settings.load();
                if let Some(hint) = missing_key_hint(&settings.endpoint_url, &settings.api_key) {
                    eprintln!("{}", hint);
                }
                let models = self
                    .app
                    .models
                    .list_models(&settings.endpoint_url, &settings.api_key)?;
                for m in &models {
                    println!("{}", m);
                }
                Ok(0)
            }
            ChatCommand::ListChats => {
                print!("{}", format_chat_list(&self.app.controller().list_chats()));
                Ok(0)
            }
            ChatCommand::ShowChat { chat, full } => {
                let mut controller = self.app.controller();
                controller.select_chat(&chat)?;
                print!("{}", format_history(controller.messages(), full));
                Ok(0)
            }
            ChatCommand::DeleteChat { chat } => {
                self.app.controller().delete_chat(&chat)?;
                println!("Deleted {}", chat);
                Ok(0)
            }
            ChatCommand::DeleteExchange {
                chat,
                assistant_index,
            } => {
                self.app
                    .controller()
                    .delete_exchange(&chat, assistant_index)?;
                Ok(0)
            }
            ChatCommand::Configure {
                endpoint,
                api_key,
                system,
                model,
            } => {
                self.app.settings.update(SettingsUpdate {
                    endpoint_url: endpoint,
                    api_key,
                    system_instructions: system,
                    model: model.map(|m| m.to_string()),
                })?;
                println!("Settings saved to {}", self.app.dirs.settings_path().display());
                Ok(0)
            }
            ChatCommand::Send {
                chat,
                model,
                prompt,
            } => {
                let model = self.resolve_model(model)?;
                let mut controller = self.app.controller();
                if let Some(id) = &chat {
                    controller.select_chat(id)?;
                }
                let mut stdout = std::io::stdout();
                let mut printer = StreamPrinter::new();
                let report = controller.submit_prompt(
                    &prompt,
                    &model,
                    self.app.interrupt.as_ref(),
                    &mut |full: &str| printer.update(&mut stdout, full),
                )?;
                let _ = printer.finish(
                    &mut stdout,
                    &controller.messages()[report.assistant_index].content,
                );
                if chat.is_none() {
                    if let Some(id) = controller.active_chat() {
                        eprintln!("(saved as {})", id);
                    }
                }
                report.commit?;
                match report.outcome {
                    StreamOutcome::Completed => Ok(0),
                    StreamOutcome::Cancelled => Ok(EXIT_CANCELLED),
                    StreamOutcome::Failed(e) => Err(e),
                }
            }
            ChatCommand::Interactive { chat, model } => {
                let model = model.or_else(|| self.app.settings.load().model.map(ModelName::from));
                let mut controller = self.app.controller();
                if let Some(id) = &chat {
                    controller.select_chat(id)?;
                }
                let mut repl = Repl::new(
                    controller,
                    self.app.settings.clone(),
                    self.app.models.clone(),
                    self.app.interrupt.clone(),
                    model,
                );
                let stdin = std::io::stdin();
                let mut stdout = std::io::stdout();
                repl.run(stdin.lock(), &mut stdout)
                    .map_err(|e| Error::io_msg(format!("{:#}", e)))?;
                let _ = stdout.flush();
                Ok(0)
            }
        }
    }

    /// -m が無ければ保存済みのモデル
    fn resolve_model(&self, explicit: Option<ModelName>) -> Result<ModelName, Error> {
        explicit
            .or_else(|| self.app.settings.load().model.map(ModelName::from))
            .ok_or_else(|| {
                Error::invalid_argument("No model selected. Use -m <model> (see -L for the list).")
            })
    }
}

fn cmd_name_for_log(cmd: &ChatCommand) -> &'static str {
    match cmd {
        ChatCommand::Help => "help",
        ChatCommand::ListModels => "list-models",
        ChatCommand::ListChats => "list-chats",
        ChatCommand::ShowChat { .. } => "show",
        ChatCommand::DeleteChat { .. } => "delete-chat",
        ChatCommand::DeleteExchange { .. } => "delete-exchange",
        ChatCommand::Configure { .. } => "configure",
        ChatCommand::Send { .. } => "send",
        ChatCommand::Interactive { .. } => "interactive",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("chat: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_chat(config.verbose)?;
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: chat [options] [message...]");
}

fn print_help() {
    println!("Usage: chat [options] [message...]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -L, --list-models             List models offered by the configured endpoint");
    println!("  --list-chats                  List saved chats, newest first");
    println!("  --show <id> [--full]          Show a chat (answers shortened to 50 words unless --full)");
    println!("  --delete-chat <id>            Delete a chat and its history");
    println!("  --delete-exchange <index>     Delete the answer at <index> and its prompt (needs -c <id>)");
    println!("  --set-endpoint <url>          Save the endpoint URL (e.g. http://localhost:11434, https://api.openai.com/v1)");
    println!("  --set-api-key <key>           Save the API key (sent as a Bearer token when not empty)");
    println!("  -S, --set-system <text>       Save the system instruction sent with every request");
    println!("  -m, --model <model>           Model for this run; saved when combined with --set-*");
    println!("  -c, --chat <id>               Continue an existing chat");
    println!("  -v, --verbose                 Also write structured logs to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Without a message, an interactive prompt starts (type /help there).");
    println!();
    println!("Environment:");
    println!("  CHAT_HOME       Home directory for settings.json, chats/ and logs/.");
    println!("                  If unset, $XDG_CONFIG_HOME/llm-chat (e.g. ~/.config/llm-chat) is used.");
    println!();
    println!("Examples:");
    println!("  chat --set-endpoint http://localhost:11434 -m llama3");
    println!("  chat Explain quicksort in two sentences");
    println!("  chat -c chat_3 And in Rust?");
}
