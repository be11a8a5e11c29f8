use super::*;
use crate::models::ContentBlock;

const SESSION: &str = r#"{"type":"session.start","data":{"sessionId":"cp-123","version":1,"producer":"copilot-agent","copilotVersion":"0.0.348","startTime":"2025-01-01T10:00:00.000Z","context":{"cwd":"/work/repo","branch":"main"}},"id":"event-1","timestamp":"2025-01-01T10:00:00.000Z","parentId":null}
{"type":"user.message","data":{"content":"Run the tests"},"id":"event-2","timestamp":"2025-01-01T10:00:05.000Z","parentId":"event-1"}
{"type":"assistant.message","data":{"messageId":"msg-1","content":"Running them now.","toolRequests":[{"toolCallId":"call_1","name":"report_intent","arguments":{"intent":"Testing"}},{"toolCallId":"call_2","name":"bash","arguments":{"command":"cargo test"}},{"toolCallId":"call_3","name":"view","arguments":{"path":"Cargo.toml"}}]},"id":"event-3","timestamp":"2025-01-01T10:00:10.000Z","parentId":"event-2"}
{"type":"tool.execution_complete","data":{"toolCallId":"call_3","success":true,"model":"claude-sonnet-4.5","result":{"content":"[package]","detailedContent":"[package]\nname = \"demo\""}},"id":"event-4","timestamp":"2025-01-01T10:00:11.000Z"}
{"type":"tool.execution_complete","data":{"toolCallId":"call_2","success":true,"result":{"content":"test result: ok"}},"id":"event-5","timestamp":"2025-01-01T10:00:20.000Z"}"#;

fn tool_call(block: &ContentBlock) -> (&str, Option<&str>, Option<&str>, Option<&str>) {
    match block {
        ContentBlock::ToolCall { name, input, output, tool_call_id } => (
            name.as_str(),
            input.as_deref(),
            output.as_deref(),
            tool_call_id.as_deref(),
        ),
        other => panic!("Expected ToolCall block, got {:?}", other),
    }
}

#[test]
fn test_parse_session() {
    let session = CopilotParser::new().parse_string(SESSION);

    // user, assistant text, bash, view; report_intent is dropped
    assert_eq!(session.messages.len(), 4);
    assert_eq!(session.messages[0].role, Role::User);
    assert_eq!(session.messages[0].text(), "Run the tests");
    assert_eq!(session.messages[1].text(), "Running them now.");

    assert_eq!(
        tool_call(&session.messages[2].content[0]),
        ("bash", Some(r#"{"command":"cargo test"}"#), Some("test result: ok"), Some("call_2"))
    );
    assert_eq!(
        tool_call(&session.messages[3].content[0]),
        ("view", Some(r#"{"path":"Cargo.toml"}"#), Some("[package]\nname = \"demo\""), Some("call_3"))
    );
}

#[test]
fn test_results_matched_by_id_not_order() {
    let session = CopilotParser::new().parse_string(SESSION);
    // call_3 completed first but must not land on call_2
    let (_, _, output, _) = tool_call(&session.messages[2].content[0]);
    assert_eq!(output, Some("test result: ok"));
}

#[test]
fn test_metadata() {
    let session = CopilotParser::new().parse_string(SESSION);
    let meta = &session.metadata;

    assert_eq!(meta.tool_name, "github_copilot");
    assert_eq!(meta.session_id.as_deref(), Some("cp-123"));
    assert_eq!(meta.start_time.as_deref(), Some("2025-01-01T10:00:00.000Z"));
    assert_eq!(meta.end_time.as_deref(), Some("2025-01-01T10:00:20.000Z"));
    assert_eq!(meta.cli_version.as_deref(), Some("0.0.348"));
    assert_eq!(meta.working_directory.as_deref(), Some("/work/repo"));
    assert_eq!(meta.git_branch.as_deref(), Some("main"));
    assert_eq!(meta.model.as_deref(), Some("claude-sonnet-4.5"));
    assert_eq!(meta.total_messages, 4);
}

#[test]
fn test_unknown_call_id_is_ignored() {
    let content = r#"{"type":"assistant.message","data":{"toolRequests":[{"toolCallId":"a","name":"bash","arguments":{}}]}}
{"type":"tool.execution_complete","data":{"toolCallId":"zzz","result":{"content":"stray"}}}"#;
    let session = CopilotParser::new().parse_string(content);

    assert_eq!(session.messages.len(), 1);
    assert_eq!(tool_call(&session.messages[0].content[0]).2, None);
}

#[test]
fn test_raw_and_error_results() {
    let content = r#"{"type":"assistant.message","data":{"toolRequests":[{"toolCallId":"a","name":"bash"},{"toolCallId":"b","name":"edit"}]}}
{"type":"tool.execution_complete","data":{"toolCallId":"a","result":"plain output"}}
{"type":"tool.execution_complete","data":{"toolCallId":"b","success":false,"error":{"message":"file not found"}}}"#;
    let session = CopilotParser::new().parse_string(content);

    assert_eq!(session.messages.len(), 2);
    assert_eq!(
        tool_call(&session.messages[0].content[0]),
        ("bash", None, Some("plain output"), Some("a"))
    );
    assert_eq!(tool_call(&session.messages[1].content[0]).2, Some("file not found"));
}

#[test]
fn test_empty_assistant_content_emits_no_text_message() {
    let content = r#"{"type":"assistant.message","data":{"content":"","toolRequests":[]}}
{"type":"user.message","data":{"content":"   "}}"#;
    let session = CopilotParser::new().parse_string(content);
    assert!(session.messages.is_empty());
}

#[test]
fn test_start_time_falls_back_to_event_timestamp() {
    let content = r#"{"type":"session.start","data":{"sessionId":"s"},"timestamp":"2025-02-02T00:00:00Z"}"#;
    let session = CopilotParser::new().parse_string(content);
    assert_eq!(session.metadata.start_time.as_deref(), Some("2025-02-02T00:00:00Z"));
    assert!(session.metadata.working_directory.is_none());
}

#[test]
fn test_empty_result_fields_do_not_fall_back_to_raw_json() {
    let content = r#"{"type":"assistant.message","data":{"toolRequests":[{"toolCallId":"c1","name":"bash"},{"toolCallId":"c2","name":"view"}]}}
{"type":"tool.execution_complete","data":{"toolCallId":"c1","result":{"content":"","detailedContent":""}}}
{"type":"tool.execution_complete","data":{"toolCallId":"c2","result":{"content":"short","detailedContent":""}}}"#;
    let session = CopilotParser::new().parse_string(content);

    assert_eq!(tool_call(&session.messages[0].content[0]).2, None);
    assert_eq!(tool_call(&session.messages[1].content[0]).2, Some("short"));
}

#[test]
fn test_result_without_text_fields_uses_raw_json() {
    let content = r#"{"type":"assistant.message","data":{"toolRequests":[{"toolCallId":"c1","name":"bash"}]}}
{"type":"tool.execution_complete","data":{"toolCallId":"c1","result":{"exitCode":0}}}"#;
    let session = CopilotParser::new().parse_string(content);
    assert_eq!(tool_call(&session.messages[0].content[0]).2, Some(r#"{"exitCode":0}"#));
}
