use crate::cli::{parse_args_from, Config};
use crate::ports::inbound::UseCaseRunner;
use crate::wiring;
use common::domain::{ChatId, Dirs, HomeDir, ModelName};
use common::error::Error;

/// 一時ホームで App を組み立て、Runner で run する（テスト用の入口）
fn run_app(home: &std::path::Path, config: Config) -> Result<i32, Error> {
    let app = wiring::wire_chat_at(Dirs::new(HomeDir::new(home)), false);
    let runner = crate::Runner { app };
    runner.run(config)
}

fn run_args(home: &std::path::Path, args: &[&str]) -> Result<i32, Error> {
    let mut argv = vec!["chat"];
    argv.extend_from_slice(args);
    run_app(home, parse_args_from(&argv)?)
}

#[test]
fn test_run_app_with_help() {
    let home = tempfile::tempdir().unwrap();
    let config = Config {
        help: true,
        ..Default::default()
    };
    assert_eq!(run_app(home.path(), config).unwrap(), 0);
}

#[test]
fn test_configure_writes_settings_file() {
    let home = tempfile::tempdir().unwrap();
    let code = run_args(
        home.path(),
        &["--set-endpoint", "http://localhost:11434", "-S", "Be brief.", "-m", "llama3"],
    )
    .unwrap();
    assert_eq!(code, 0);
    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("settings.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw["endpointURL"], "http://localhost:11434");
    assert_eq!(raw["apiKey"], "");
    assert_eq!(raw["systemInstructions"], "Be brief.");
    assert_eq!(raw["model"], "llama3");
}

#[test]
fn test_list_models_without_endpoint_is_discovery_error() {
    let home = tempfile::tempdir().unwrap();
    let err = run_args(home.path(), &["-L"]).unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));
    assert_eq!(err.exit_code(), 69);
}

#[test]
fn test_send_without_model_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let err = run_args(home.path(), &["hello"]).unwrap_err();
    assert_eq!(err.exit_code(), 64);
    assert!(!home.path().join("chats/index.json").exists());
}

#[test]
fn test_send_without_endpoint_records_failed_exchange() {
    // 接続先が未設定なので送信前に失敗するが、交換としては保存される
    let home = tempfile::tempdir().unwrap();
    let config = Config {
        model: Some(ModelName::new("llama3")),
        message_args: vec!["Explain".to_string(), "quicksort".to_string()],
        ..Default::default()
    };
    let err = run_app(home.path(), config).unwrap_err();
    assert!(matches!(err, Error::Stream(_)));
    assert_eq!(err.exit_code(), 69);

    let index = std::fs::read_to_string(home.path().join("chats/index.json")).unwrap();
    assert!(index.contains("\"chat_1\""));
    assert!(index.contains("\"Explain quicksort\""));
    let log: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("chats/chat_1.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(log[0]["content"], "Explain quicksort");
    assert_eq!(log[1]["role"], "assistant");
    assert_eq!(
        log[1]["content"],
        "\n\n<Request failed: endpoint URL is not set>"
    );

    // 構造化ログに開始・終了が残る
    let jsonl = std::fs::read_to_string(home.path().join("logs/chat.jsonl")).unwrap();
    assert!(jsonl.contains("\"command started\""));
    assert!(jsonl.contains("\"exit_code\":69"));

    // 一覧・表示・削除
    assert_eq!(run_args(home.path(), &["--list-chats"]).unwrap(), 0);
    assert_eq!(run_args(home.path(), &["--show", "chat_1"]).unwrap(), 0);
    let config = Config {
        delete_exchange: Some(1),
        chat: Some(ChatId::new("chat_1")),
        ..Default::default()
    };
    assert_eq!(run_app(home.path(), config).unwrap(), 0);
    assert_eq!(
        std::fs::read_to_string(home.path().join("chats/chat_1.json")).unwrap().trim(),
        "[]"
    );
    assert_eq!(run_args(home.path(), &["--delete-chat", "chat_1"]).unwrap(), 0);
    assert!(!home.path().join("chats/chat_1.json").exists());
}

#[test]
fn test_unknown_chat_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let err = run_args(home.path(), &["--delete-chat", "chat_42"]).unwrap_err();
    assert_eq!(err.exit_code(), 64);
    let err = run_args(home.path(), &["--show", "chat_42"]).unwrap_err();
    assert_eq!(err.exit_code(), 64);
}
