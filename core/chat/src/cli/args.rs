use crate::domain::ChatCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ChatId, ModelName};
use common::error::Error;

const BIN_NAME: &str = "chat";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -L / --list-models: エンドポイントのモデル一覧を表示
    pub list_models: bool,
    /// --list-chats: 保存済みチャットを新しい順に表示
    pub list_chats: bool,
    /// --show <id>: チャットの履歴を表示（--full で応答を省略しない）
    pub show: Option<ChatId>,
    pub full: bool,
    pub delete_chat: Option<ChatId>,
    /// --delete-exchange <index>: -c で指定したチャットの応答と直前のプロンプトを削除
    pub delete_exchange: Option<usize>,
    pub set_endpoint: Option<String>,
    pub set_api_key: Option<String>,
    pub set_system: Option<String>,
    pub model: Option<ModelName>,
    /// -c / --chat: 対象チャット（送信・対話・削除）
    pub chat: Option<ChatId>,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    pub message_args: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Chat with an OpenAI-compatible endpoint; history is kept per chat")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-models")
                .short('L')
                .long("list-models")
                .help("List models offered by the configured endpoint")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-chats")
                .long("list-chats")
                .help("List saved chats, newest first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("show")
                .long("show")
                .value_name("id")
                .help("Show the messages of a chat")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("full")
                .long("full")
                .help("With --show: do not shorten long answers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("delete-chat")
                .long("delete-chat")
                .value_name("id")
                .help("Delete a chat and its history")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("delete-exchange")
                .long("delete-exchange")
                .value_name("index")
                .help("Delete the answer at <index> and its prompt (use with -c/--chat)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("set-endpoint")
                .long("set-endpoint")
                .value_name("url")
                .help("Save the endpoint URL")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("set-api-key")
                .long("set-api-key")
                .value_name("key")
                .help("Save the API key (empty string to clear)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("set-system")
                .short('S')
                .long("set-system")
                .value_name("instruction")
                .help("Save the system instruction sent with every request")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model id for this run (saved when combined with --set-*)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("chat")
                .short('c')
                .long("chat")
                .value_name("id")
                .help("Continue an existing chat")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("message")
                .index(1)
                .help("Message words to send once (omit for the interactive prompt)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let string = |id: &str| matches.get_one::<String>(id).cloned();
    Config {
        help: matches.get_flag("help"),
        list_models: matches.get_flag("list-models"),
        list_chats: matches.get_flag("list-chats"),
        show: string("show").map(ChatId::from),
        full: matches.get_flag("full"),
        delete_chat: string("delete-chat").map(ChatId::from),
        delete_exchange: matches.get_one::<usize>("delete-exchange").copied(),
        set_endpoint: string("set-endpoint"),
        set_api_key: string("set-api-key"),
        set_system: string("set-system"),
        model: string("model").map(ModelName::from),
        chat: string("chat").map(ChatId::from),
        verbose: matches.get_flag("verbose"),
        message_args: matches
            .get_many::<String>("message")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
}

/// Config を ChatCommand に変換する
pub fn config_to_command(config: Config) -> Result<ChatCommand, Error> {
    if config.help {
        return Ok(ChatCommand::Help);
    }

    if config.list_models {
        return Ok(ChatCommand::ListModels);
    }

    if config.list_chats {
        return Ok(ChatCommand::ListChats);
    }

    if let Some(chat) = config.show {
        return Ok(ChatCommand::ShowChat {
            chat,
            full: config.full,
        });
    }

    if let Some(chat) = config.delete_chat {
        return Ok(ChatCommand::DeleteChat { chat });
    }

    if let Some(assistant_index) = config.delete_exchange {
        let chat = config.chat.ok_or_else(|| {
            Error::invalid_argument("--delete-exchange requires -c/--chat <id>")
        })?;
        return Ok(ChatCommand::DeleteExchange {
            chat,
            assistant_index,
        });
    }

    if config.set_endpoint.is_some() || config.set_api_key.is_some() || config.set_system.is_some()
    {
        return Ok(ChatCommand::Configure {
            endpoint: config.set_endpoint,
            api_key: config.set_api_key,
            system: config.set_system,
            model: config.model,
        });
    }

    if !config.message_args.is_empty() {
        return Ok(ChatCommand::Send {
            chat: config.chat,
            model: config.model,
            prompt: config.message_args.join(" "),
        });
    }

    Ok(ChatCommand::Interactive {
        chat: config.chat,
        model: config.model,
    })
}
