mod common;

use common::{setup_with, MockCatalog, MockGenerator, MockVectorStore};
use ragkit::domain::entities::chat_message::ChatMessage;

#[tokio::test]
async fn test_context_rides_a_leading_turn() {
    let generator = MockGenerator::with_responses(&["reply"]);
    let t = setup_with(MockVectorStore::default(), generator, MockCatalog::default());

    let messages = vec![
        ChatMessage::user("first question"),
        ChatMessage::assistant("first answer"),
        ChatMessage::user("follow-up"),
    ];
    let reply = t
        .kit
        .chat(messages, Some("background facts"), Some("be terse"))
        .await
        .unwrap();
    assert_eq!(reply, "reply");

    let requests = t.generator.requests.lock().unwrap();
    let (sent, opts) = &requests[0];
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0].role, "user");
    assert_eq!(sent[0].content, "Context:\nbackground facts");
    // Caller-specified order is preserved after the context turn.
    assert_eq!(sent[1].content, "first question");
    assert_eq!(sent[2].content, "first answer");
    assert_eq!(sent[3].content, "follow-up");
    assert_eq!(opts.system_prompt.as_deref(), Some("be terse"));
}

#[tokio::test]
async fn test_chat_without_context_passes_messages_through() {
    let t = setup_with(
        MockVectorStore::default(),
        MockGenerator::default(),
        MockCatalog::default(),
    );

    t.kit
        .chat(vec![ChatMessage::user("hello")], None, None)
        .await
        .unwrap();

    let requests = t.generator.requests.lock().unwrap();
    let (sent, opts) = &requests[0];
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content, "hello");
    assert!(opts.system_prompt.is_none());
}
