use super::*;
use crate::utils::AppConfig;

struct CannedBackend(&'static str);

impl AssistantBackend for CannedBackend {
    fn send_message(&self, history: &[ChatMessage]) -> Result<String, BackendError> {
        if history.is_empty() {
            return Err(BackendError::EmptyReply);
        }
        Ok(self.0.to_string())
    }
}

#[test]
fn test_log_starts_with_hidden_system_prompt() {
    let log = ChatLog::with_system_prompt(DEFAULT_SYSTEM_PROMPT);
    assert_eq!(log.len(), 1);
    assert_eq!(log.messages()[0].role, Role::System);
    assert_eq!(log.visible().count(), 0);
}

#[test]
fn test_blank_prompt_is_not_logged() {
    assert!(ChatLog::with_system_prompt("   ").is_empty());
}

#[test]
fn test_blank_user_input_is_rejected() {
    let mut log = ChatLog::new();
    assert!(log.push_user("  \n ").is_none());
    assert!(log.is_empty());
    assert!(log.push_user("how many users?").is_some());
    assert_eq!(log.len(), 1);
}

#[test]
fn test_messages_keep_append_order() {
    let mut log = ChatLog::with_system_prompt("be brief");
    log.push_user("count users");
    log.push_assistant("SELECT COUNT(*) FROM \"users\";");

    let roles: Vec<Role> = log.visible().map(|message| message.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
}

#[test]
fn test_user_messages_are_never_parsed_as_sql() {
    let message = ChatMessage::new(Role::User, "SELECT * FROM users;");
    assert_eq!(
        message.segments(),
        vec![Segment::plain("SELECT * FROM users;")]
    );
}

#[test]
fn test_assistant_messages_go_through_the_pipeline() {
    let mut log = ChatLog::new();
    log.push_user("one");
    let reply = CannedBackend("SELECT 1;\nResult: [{\"1\":1}]")
        .send_message(log.messages())
        .unwrap();
    let segments = log.push_assistant(&reply).segments();

    assert_eq!(segments.len(), 2);
    assert!(segments[0].is_sql());
    assert!(matches!(segments[1], Segment::ResultTable { .. }));
}

#[test]
fn test_history_encoding_uses_lowercase_roles() {
    let mut log = ChatLog::with_system_prompt("sys");
    log.push_user("hi");
    let encoded = encode_history(log.messages()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(value["messages"][0]["role"], "system");
    assert_eq!(value["messages"][1]["role"], "user");
    assert_eq!(value["messages"][1]["content"], "hi");
}

#[test]
fn test_unconfigured_backend_is_reported() {
    let config = AppConfig::new();
    assert!(matches!(
        backend_from_config(&config),
        Err(BackendError::NotConfigured(_))
    ));
}

#[test]
fn test_missing_program_fails_to_spawn() {
    let backend = CommandBackend::new("sql-chat-no-such-program", Vec::new());
    let history = [ChatMessage::new(Role::User, "hi")];
    assert!(matches!(
        backend.send_message(&history),
        Err(BackendError::Spawn { .. })
    ));
}

#[cfg(unix)]
fn shell(script: &str) -> CommandBackend {
    CommandBackend::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(unix)]
#[test]
fn test_command_backend_reads_reply_from_stdout() {
    let backend = shell("cat > /dev/null; printf '  SELECT 1;\\n'");
    let history = [ChatMessage::new(Role::User, "one")];
    assert_eq!(backend.send_message(&history).unwrap(), "SELECT 1;");
}

#[cfg(unix)]
#[test]
fn test_command_backend_receives_history_on_stdin() {
    let backend = shell("cat");
    let history = [
        ChatMessage::new(Role::System, "sys"),
        ChatMessage::new(Role::User, "list tables"),
    ];
    let reply = backend.send_message(&history).unwrap();
    assert_eq!(reply, encode_history(&history).unwrap());
}

#[cfg(unix)]
#[test]
fn test_command_backend_failure_keeps_stderr() {
    let backend = shell("cat > /dev/null; echo boom >&2; exit 3");
    let history = [ChatMessage::new(Role::User, "one")];
    match backend.send_message(&history) {
        Err(BackendError::Exit { status, stderr }) => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected exit error, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_command_backend_rejects_blank_reply() {
    let backend = shell("cat > /dev/null; echo '   '");
    let history = [ChatMessage::new(Role::User, "one")];
    assert!(matches!(
        backend.send_message(&history),
        Err(BackendError::EmptyReply)
    ));
}
