//! Admission under a stalled dispatcher: the queue keeps the oldest commands
//! and drops the rest, while every line still gets its response.

mod common;

use common::{Recorder, TIMEOUT};
use slirc_bridge::ChatSession;
use slirc_bridge::control::{
    ControlListener, DEFAULT_QUEUE_CAPACITY, Dispatcher, HandleListener, command_queue,
};
use slirc_bridge::state::TargetRegistry;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

#[tokio::test]
async fn stalled_dispatcher_keeps_first_ten() {
    let logs = tempfile::tempdir().unwrap();
    let registry = Arc::new(TargetRegistry::new(logs.path()));
    let recorder = Arc::new(Recorder::default());

    let (queue, rx) = command_queue(DEFAULT_QUEUE_CAPACITY);
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    let listener = tokio::spawn(Box::new(HandleListener::new(theirs)).run(queue));

    let (mut read, mut write) = tokio::io::split(ours);
    let mut input = String::new();
    for i in 0..15 {
        input.push_str(&format!("join #c{i}\n"));
    }
    write.write_all(input.as_bytes()).await.unwrap();
    write.shutdown().await.unwrap();

    // The listener answers every line and exits at end of input without any
    // command having been consumed.
    timeout(TIMEOUT, listener).await.unwrap().unwrap().unwrap();
    let mut output = String::new();
    read.read_to_string(&mut output).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 30);
    assert_eq!(lines[28], "Got: [join #c14]");
    assert_eq!(lines[29], "Join { target: \"#c14\" }");

    let session: Arc<dyn ChatSession> = Arc::clone(&recorder) as Arc<dyn ChatSession>;
    timeout(TIMEOUT, Dispatcher::new(rx, session, registry).run())
        .await
        .unwrap()
        .unwrap();

    let expected: Vec<String> = (0..10).map(|i| format!("JOIN #c{i}")).collect();
    assert_eq!(recorder.calls(), expected);
}

#[tokio::test]
async fn messages_apply_in_admission_order() {
    let logs = tempfile::tempdir().unwrap();
    let registry = Arc::new(TargetRegistry::new(logs.path()));
    let recorder = Arc::new(Recorder::default());

    let (queue, rx) = command_queue(DEFAULT_QUEUE_CAPACITY);
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    let listener = tokio::spawn(Box::new(HandleListener::new(theirs)).run(queue));
    let dispatcher = tokio::spawn(
        Dispatcher::new(rx, Arc::clone(&recorder) as Arc<dyn ChatSession>, Arc::clone(&registry))
            .run(),
    );

    let (mut read, mut write) = tokio::io::split(ours);
    write
        .write_all(b"join #a\nmsg #a one\nmsg alice two words\npart #a\nnick glenda\n")
        .await
        .unwrap();
    write.shutdown().await.unwrap();
    let mut output = String::new();
    read.read_to_string(&mut output).await.unwrap();
    assert_eq!(output.lines().count(), 10);

    timeout(TIMEOUT, listener).await.unwrap().unwrap().unwrap();
    timeout(TIMEOUT, dispatcher).await.unwrap().unwrap().unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            "JOIN #a",
            "PRIVMSG #a one",
            "PRIVMSG alice two words",
            "PART #a",
            "NICK glenda",
        ]
    );
    let dm = std::fs::read_to_string(logs.path().join("alice")).unwrap();
    assert!(dm.ends_with("] bridge: two words\n"));
    let channel = std::fs::read_to_string(logs.path().join("#a")).unwrap();
    assert!(channel.ends_with("] bridge: one\n"));
}
