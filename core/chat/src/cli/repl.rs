//! 対話モード（1 行ずつ読み、スラッシュコマンド以外はプロンプトとして送る）
//!
//! どの失敗も表示してプロンプトに戻る。終了は /quit か EOF。

use anyhow::Context;
use common::domain::{ChatId, ModelName};
use common::error::Error;
use common::llm::models::requires_api_key;
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::cli::view::{format_chat_list, format_history, StreamPrinter};
use crate::domain::StreamOutcome;
use crate::ports::outbound::InterruptChecker;
use crate::usecase::{ModelDirectory, SessionController, SettingsService, SettingsUpdate};

/// 1 行の解釈結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    New,
    Chats,
    Open(ChatId),
    History { full: bool },
    Delete(usize),
    Drop(ChatId),
    Models,
    Model(ModelName),
    Help,
    Quit,
    Prompt(String),
    /// 引数が足りない・数値でないなど
    Usage(&'static str),
}

/// コマンド判定だけ前後の空白を除いて行う。プロンプトは行末の改行以外そのまま送る
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        return ReplCommand::Prompt(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    }
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (cmd, arg) {
        ("/new", _) => ReplCommand::New,
        ("/chats", _) => ReplCommand::Chats,
        ("/open", Some(id)) => ReplCommand::Open(ChatId::from(id)),
        ("/open", None) => ReplCommand::Usage("/open <id>"),
        ("/history", Some("full")) => ReplCommand::History { full: true },
        ("/history", _) => ReplCommand::History { full: false },
        ("/delete", Some(n)) => match n.parse() {
            Ok(i) => ReplCommand::Delete(i),
            Err(_) => ReplCommand::Usage("/delete <assistant-index>"),
        },
        ("/delete", None) => ReplCommand::Usage("/delete <assistant-index>"),
        ("/drop", Some(id)) => ReplCommand::Drop(ChatId::from(id)),
        ("/drop", None) => ReplCommand::Usage("/drop <id>"),
        ("/models", _) => ReplCommand::Models,
        ("/model", Some(id)) => ReplCommand::Model(ModelName::new(id)),
        ("/model", None) => ReplCommand::Usage("/model <id>"),
        ("/help", _) => ReplCommand::Help,
        ("/quit", _) | ("/exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Usage("unknown command; /help lists commands"),
    }
}

/// キーが必要そうなエンドポイントでキーが空なら注意書きを返す
pub fn missing_key_hint(endpoint_url: &str, api_key: &str) -> Option<&'static str> {
    let needs_key = !endpoint_url.trim().is_empty() && requires_api_key(endpoint_url.trim());
    (needs_key && api_key.trim().is_empty())
        .then_some("note: no API key is set (use --set-api-key <key>)")
}

const HELP: &str = "\
Commands:
  /new                 start a new chat (created on the first prompt)
  /chats               list saved chats, newest first
  /open <id>           switch to a saved chat
  /history [full]      show the current chat (answers shortened unless 'full')
  /delete <index>      delete the answer at <index> and its prompt
  /drop <id>           delete a chat
  /models              list models of the configured endpoint
  /model <id>          use (and save) a model
  /help                show this help
  /quit                exit (Ctrl+D also works)
Anything else is sent as a prompt, indentation included.
Ctrl+C stops an answer once it has started streaming. It does not exit at the
prompt (use /quit or Ctrl+D), and it cannot interrupt a request that is still
waiting for the server's first response.";

pub struct Repl {
    controller: SessionController,
    settings: SettingsService,
    models: ModelDirectory,
    interrupt: Arc<dyn InterruptChecker>,
    model: Option<ModelName>,
}

impl Repl {
    pub fn new(
        controller: SessionController,
        settings: SettingsService,
        models: ModelDirectory,
        interrupt: Arc<dyn InterruptChecker>,
        model: Option<ModelName>,
    ) -> Self {
        Self {
            controller,
            settings,
            models,
            interrupt,
            model,
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn run<R: BufRead>(&mut self, input: R, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "Type /help for commands.").context("writing to terminal")?;
        let mut lines = input.lines();
        loop {
            let prompt = match self.controller.active_chat() {
                Some(id) => format!("{}> ", id),
                None => "> ".to_string(),
            };
            write!(out, "{}", prompt).context("writing to terminal")?;
            out.flush().context("writing to terminal")?;
            let line = match lines.next() {
                Some(line) => line.context("reading from terminal")?,
                None => break,
            };
            if !self.handle(parse_line(&line), out)? {
                break;
            }
        }
        writeln!(out).context("writing to terminal")?;
        Ok(())
    }

    /// false を返したら終了
    fn handle(&mut self, cmd: ReplCommand, out: &mut dyn Write) -> anyhow::Result<bool> {
        let result: Result<(), Error> = match cmd {
            ReplCommand::Empty => Ok(()),
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            ReplCommand::Usage(usage) => {
                writeln!(out, "usage: {}", usage)?;
                Ok(())
            }
            ReplCommand::New => {
                self.controller.start_new_chat_pending();
                writeln!(out, "New chat; it is saved when you send the first prompt.")?;
                Ok(())
            }
            ReplCommand::Chats => {
                write!(out, "{}", format_chat_list(&self.controller.list_chats()))?;
                Ok(())
            }
            ReplCommand::Open(id) => match self.controller.select_chat(&id) {
                Ok(()) => {
                    write!(out, "{}", format_history(self.controller.messages(), false))?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ReplCommand::History { full } => {
                write!(out, "{}", format_history(self.controller.messages(), full))?;
                Ok(())
            }
            ReplCommand::Delete(index) => match self.controller.active_chat().cloned() {
                Some(id) => self.controller.delete_exchange(&id, index),
                None => Err(Error::invalid_argument("No chat is open")),
            },
            ReplCommand::Drop(id) => self.controller.delete_chat(&id),
            ReplCommand::Models => {
                let settings = self.settings.load();
                if let Some(hint) = missing_key_hint(&settings.endpoint_url, &settings.api_key) {
                    writeln!(out, "{}", hint)?;
                }
                // 失敗は表示して空一覧として扱う
                let models = match self.models.list_models(&settings.endpoint_url, &settings.api_key) {
                    Ok(models) => models,
                    Err(e) => {
                        writeln!(out, "{}", e)?;
                        Vec::new()
                    }
                };
                for m in &models {
                    let mark = if self.model.as_ref() == Some(m) { " *" } else { "" };
                    writeln!(out, "{}{}", m, mark)?;
                }
                Ok(())
            }
            ReplCommand::Model(model) => {
                self.model = Some(model.clone());
                self.settings
                    .update(SettingsUpdate {
                        model: Some(model.to_string()),
                        ..Default::default()
                    })
                    .map(|_| ())
            }
            ReplCommand::Prompt(text) => self.send(&text, out),
        };
        if let Err(e) = result {
            writeln!(out, "error: {}", e).context("writing to terminal")?;
        }
        Ok(true)
    }

    fn send(&mut self, text: &str, out: &mut dyn Write) -> Result<(), Error> {
        let model = self
            .model
            .clone()
            .ok_or_else(|| Error::invalid_argument("No model selected; use /models and /model <id>"))?;
        let mut printer = StreamPrinter::new();
        let report = self.controller.submit_prompt(
            text,
            &model,
            self.interrupt.as_ref(),
            &mut |full: &str| printer.update(out, full),
        )?;
        let final_text = &self.controller.messages()[report.assistant_index].content;
        let _ = printer.finish(out, final_text);
        if report.outcome == StreamOutcome::Cancelled {
            let _ = writeln!(out, "[cancelled]");
        }
        report.commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_prompt_and_commands() {
        assert_eq!(parse_line("  "), ReplCommand::Empty);
        assert_eq!(parse_line(" hello there "), ReplCommand::Prompt(" hello there ".to_string()));
        assert_eq!(parse_line("    fn main() {}\r"), ReplCommand::Prompt("    fn main() {}".to_string()));
        assert_eq!(parse_line("  /quit  "), ReplCommand::Quit);
        assert_eq!(parse_line("/open chat_2"), ReplCommand::Open(ChatId::new("chat_2")));
        assert_eq!(parse_line("/history full"), ReplCommand::History { full: true });
        assert_eq!(parse_line("/history"), ReplCommand::History { full: false });
        assert_eq!(parse_line("/delete 3"), ReplCommand::Delete(3));
        assert_eq!(parse_line("/model llama3"), ReplCommand::Model(ModelName::new("llama3")));
        assert_eq!(parse_line("/quit"), ReplCommand::Quit);
    }

    #[test]
    fn test_missing_key_hint() {
        assert!(missing_key_hint("https://api.openai.com/v1", "").is_some());
        assert!(missing_key_hint("https://api.openai.com/v1", "sk-1").is_none());
        assert!(missing_key_hint("http://localhost:11434", "").is_none());
        assert!(missing_key_hint("", "").is_none());
    }

    #[test]
    fn test_parse_line_usage_errors() {
        assert!(matches!(parse_line("/delete x"), ReplCommand::Usage(_)));
        assert!(matches!(parse_line("/open"), ReplCommand::Usage(_)));
        assert!(matches!(parse_line("/frobnicate"), ReplCommand::Usage(_)));
    }
}
