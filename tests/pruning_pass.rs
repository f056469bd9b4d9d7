use dcp_prune::engine::placeholder;
use dcp_prune::engine::strategies::summarize_args;
use dcp_prune::transcript::{AssistantBlock, ContentBlock, Message};
use dcp_prune::{DcpConfig, SessionState, StrategyKind, run_pass};
use serde_json::{Value, json};

fn text(message: &Message) -> Vec<ContentBlock> {
    message
        .as_tool_result()
        .map(|r| r.content.clone())
        .expect("tool result")
}

fn call_args(message: &Message) -> Value {
    match message {
        Message::Assistant(a) => match &a.content[0] {
            AssistantBlock::ToolCall { arguments, .. } => arguments.clone(),
            _ => panic!("expected a tool call"),
        },
        _ => panic!("expected an assistant message"),
    }
}

fn policy_with_window(turns: usize) -> DcpConfig {
    let mut config = DcpConfig::default();
    config.turn_protection.turns = turns;
    config
}

#[test]
fn test_duplicate_read_keeps_newest_copy() {
    let mut messages = vec![
        Message::user("read a.txt"),
        Message::tool_call("c1", "read", json!({ "path": "a.txt" })),
        Message::tool_result("c1", "read", vec![ContentBlock::text("alpha")], false),
        Message::user("ok"),
        Message::user("read it again"),
        Message::tool_call("c2", "read", json!({ "path": "a.txt" })),
        Message::tool_result("c2", "read", vec![ContentBlock::text("alpha")], false),
    ];

    let policy = policy_with_window(1);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    assert_eq!(text(&messages[2]), vec![ContentBlock::text(placeholder::DUPLICATE)]);
    assert_eq!(text(&messages[6]), vec![ContentBlock::text("alpha")]);
    assert_eq!(state.stats.pruned_items_count.deduplicate, 1);
}

#[test]
fn test_error_purged_only_once_old_enough() {
    let mut messages = vec![
        Message::user("build"),
        Message::tool_call("c1", "bash", json!({ "command": "cargo build" })),
        Message::tool_result(
            "c1",
            "bash",
            vec![ContentBlock::text("error[E0308]: mismatched types\n --> src/main.rs:4:5")],
            true,
        ),
        Message::user("try again"),
        Message::tool_call("c2", "bash", json!({ "command": "cargo test" })),
        Message::tool_result("c2", "bash", vec![ContentBlock::text("error: test failed\nmore")], true),
        Message::user("one"),
        Message::user("two"),
    ];

    let mut policy = policy_with_window(2);
    policy.strategies.purge_errors.min_turn_age = 3;
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    // First error is 3 turns old, the second 2.
    assert_eq!(
        text(&messages[2]),
        vec![ContentBlock::text(placeholder::stale_error("error[E0308]: mismatched types"))]
    );
    assert_eq!(
        text(&messages[5]),
        vec![ContentBlock::text("error: test failed\nmore")]
    );
    assert_eq!(state.stats.pruned_items_count.purge_errors, 1);
}

#[test]
fn test_write_superseded_by_later_read() {
    let mut messages = vec![
        Message::user("write files"),
        Message::tool_call("w1", "write", json!({ "path": "a.txt", "content": "A".repeat(80) })),
        Message::tool_result("w1", "write", vec![ContentBlock::text("ok")], false),
        Message::tool_call("w2", "write", json!({ "path": "b.txt", "content": "B".repeat(80) })),
        Message::tool_result("w2", "write", vec![ContentBlock::text("ok")], false),
        Message::tool_call("r1", "read", json!({ "path": "a.txt" })),
        Message::tool_result("r1", "read", vec![ContentBlock::text("A".repeat(80))], false),
        Message::tool_call("r2", "read", json!({ "path": "c.txt" })),
        Message::tool_result("r2", "read", vec![ContentBlock::text("C")], false),
    ];

    let mut policy = DcpConfig::default();
    policy.strategies.supersede_writes.enabled = true;
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    assert_eq!(call_args(&messages[1])["content"], placeholder::SUPERSEDED_CONTENT);
    assert_eq!(call_args(&messages[3])["content"], "B".repeat(80));
    assert_eq!(state.stats.pruned_items_count.supersede_writes, 1);
    assert_eq!(state.tokens_saved(), 20);
}

#[test]
fn test_large_output_replaced_only_outside_window() {
    let body = "line of output\n".repeat(100);
    let mut messages = vec![
        Message::user("list"),
        Message::tool_call("c1", "bash", json!({ "command": "find ." })),
        Message::tool_result("c1", "bash", vec![ContentBlock::text(&body)], false),
        Message::user("again"),
        Message::user("and now"),
        Message::tool_call("c2", "bash", json!({ "command": "find src" })),
        Message::tool_result("c2", "bash", vec![ContentBlock::text(&body)], false),
    ];

    let policy = policy_with_window(2);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    assert_eq!(
        text(&messages[2]),
        vec![ContentBlock::text(placeholder::large_output(
            "bash",
            r#"{"command":"find ."}"#,
            2
        ))]
    );
    assert_eq!(text(&messages[6]), vec![ContentBlock::text(&body)]);
    assert_eq!(state.stats.pruned_items_count.output_body_replace, 1);
    assert_eq!(state.tokens_saved(), body.len() / 4);
}

#[test]
fn test_later_strategies_skip_earlier_placeholders() {
    let body = "x".repeat(3000);
    let mut messages = vec![
        Message::user("read"),
        Message::tool_call("c1", "read", json!({ "path": "big.log" })),
        Message::tool_result("c1", "read", vec![ContentBlock::text(&body)], false),
        Message::tool_call("c2", "read", json!({ "path": "big.log" })),
        Message::tool_result("c2", "read", vec![ContentBlock::text(&body)], false),
        Message::user("next"),
    ];

    let policy = policy_with_window(1);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    assert_eq!(text(&messages[2]), vec![ContentBlock::text(placeholder::DUPLICATE)]);
    assert_eq!(
        text(&messages[4]),
        vec![ContentBlock::text(placeholder::large_output(
            "read",
            r#"{"path":"big.log"}"#,
            1
        ))]
    );
    assert_eq!(state.pruned(StrategyKind::Deduplicate), 1);
    assert_eq!(state.pruned(StrategyKind::OutputBodyReplace), 1);
    assert_eq!(state.details.len(), 2);
    assert_eq!(state.details[0].strategy, StrategyKind::Deduplicate);
    assert_eq!(state.details[1].strategy, StrategyKind::OutputBodyReplace);
}

#[test]
fn test_protected_tools_and_files_survive_a_full_pass() {
    let big = "p".repeat(5000);
    let mut messages = vec![
        Message::user("plan"),
        Message::tool_call("t1", "todo", json!({ "action": "list" })),
        Message::tool_result("t1", "todo", vec![ContentBlock::text(&big)], false),
        Message::tool_call("r1", "read", json!({ "path": "docs/CHANGELOG.md" })),
        Message::tool_result("r1", "read", vec![ContentBlock::text(&big)], false),
        Message::tool_call("t2", "todo", json!({ "action": "list" })),
        Message::tool_result("t2", "todo", vec![ContentBlock::text("boom")], true),
    ];
    messages.extend((0..10).map(|n| Message::user(format!("turn {}", n))));
    let before = messages.clone();

    let policy = policy_with_window(0);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    assert_eq!(messages, before);
    assert_eq!(state.stats.pruned_items_count.total(), 0);
    assert!(state.stats.protected_skip_count >= 3);
}

#[test]
fn test_unknown_fields_survive_a_pass() {
    let raw = json!([
        { "role": "user", "content": "go", "timestamp": 1 },
        {
            "role": "assistant",
            "content": [{ "type": "toolCall", "id": "c1", "name": "bash", "arguments": { "command": "ls" } }],
            "usage": { "input": 10, "output": 3 }
        },
        {
            "role": "toolResult",
            "toolCallId": "c1",
            "toolName": "bash",
            "content": [{ "type": "text", "text": "y".repeat(2000) }],
            "isError": false,
            "timestamp": 2
        },
        { "role": "user", "content": "next" }
    ]);
    let mut messages: Vec<Message> = serde_json::from_value(raw).unwrap();

    let policy = policy_with_window(1);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    let out = serde_json::to_value(&messages).unwrap();
    assert_eq!(out[0]["timestamp"], 1);
    assert_eq!(out[1]["usage"]["input"], 10);
    assert_eq!(out[2]["timestamp"], 2);
    assert!(
        out[2]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with(placeholder::PREFIX)
    );
}

#[test]
fn test_output_summary_reflects_superseded_arguments() {
    let mut messages = vec![
        Message::user("write it"),
        Message::tool_call("w1", "write", json!({ "path": "a.txt", "content": "A".repeat(80) })),
        Message::tool_result("w1", "write", vec![ContentBlock::text("w".repeat(1500))], false),
        Message::tool_call("r1", "read", json!({ "path": "a.txt" })),
        Message::tool_result("r1", "read", vec![ContentBlock::text("A")], false),
        Message::user("next"),
    ];

    let mut policy = policy_with_window(1);
    policy.strategies.supersede_writes.enabled = true;
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    let collapsed = call_args(&messages[1]);
    assert_eq!(collapsed["content"], placeholder::SUPERSEDED_CONTENT);
    let summary = summarize_args(Some(&collapsed));
    assert!(summary.contains(placeholder::SUPERSEDED_CONTENT));
    assert_eq!(
        text(&messages[2]),
        vec![ContentBlock::text(placeholder::large_output("write", &summary, 1))]
    );
    assert_eq!(state.pruned(StrategyKind::SupersedeWrites), 1);
    assert_eq!(state.pruned(StrategyKind::OutputBodyReplace), 1);
}

#[test]
fn test_unmodelled_roles_pass_through_a_pass() {
    let bash_execution = json!({ "role": "bashExecution", "command": "ls", "output": "a.txt" });
    let summary = json!({ "role": "compactionSummary", "summary": "earlier work" });
    let raw = json!([
        { "role": "user", "content": "go" },
        {
            "role": "assistant",
            "content": [
                { "type": "text", "text": "listing", "textSignature": "sig-abc" },
                { "type": "toolCall", "id": "c1", "name": "bash", "arguments": { "command": "find ." }, "thoughtSignature": "ts" }
            ]
        },
        {
            "role": "toolResult",
            "toolCallId": "c1",
            "toolName": "bash",
            "content": [{ "type": "text", "text": "z".repeat(2000) }],
            "isError": false
        },
        bash_execution.clone(),
        summary.clone(),
        { "role": "user", "content": "next" }
    ]);
    let mut messages: Vec<Message> = serde_json::from_value(raw).unwrap();

    let policy = policy_with_window(1);
    let mut state = SessionState::new();
    run_pass(&mut messages, &policy, &mut state);

    // The extra entries do not start turns, so the result is one turn old.
    assert_eq!(
        text(&messages[2]),
        vec![ContentBlock::text(placeholder::large_output(
            "bash",
            r#"{"command":"find ."}"#,
            1
        ))]
    );

    let out = serde_json::to_value(&messages).unwrap();
    assert_eq!(out[1]["content"][0]["textSignature"], "sig-abc");
    assert_eq!(out[1]["content"][1]["thoughtSignature"], "ts");
    assert_eq!(out[3], bash_execution);
    assert_eq!(out[4], summary);
}
