//! End-to-end flow: register, sign in, open a bilingual session, exchange
//! messages, observe the bus.

use std::sync::Arc;
use std::time::Duration;

use linguisita::{
    ChatSession, DictionaryTranslator, Error, Event, EventBus, IdentityProvider, Language,
    LocalIdentity, MemoryStore, SessionState,
};

#[tokio::test]
async fn english_user_chats_with_spanish_partner() {
    let identity = LocalIdentity::new();
    identity
        .sign_up("alice@example.com", "password1", Language::English)
        .await
        .unwrap();
    let user = identity
        .sign_in("alice@example.com", "password1")
        .await
        .unwrap();

    let bus = Arc::new(EventBus::new());
    let mut events = bus.subscribe();
    let session = ChatSession::new(
        user.clone(),
        Language::Spanish,
        Arc::new(MemoryStore::new()),
        Arc::new(DictionaryTranslator::with_delay(Duration::ZERO)),
        bus,
    );

    assert_eq!(session.user_language(), Language::English);
    assert_eq!(session.partner_language(), Language::Spanish);
    assert_eq!(session.state(), SessionState::Idle);

    // A known phrase resolves through the dictionary.
    let first = session.send("Hello").await.unwrap();
    assert_eq!(first.original_text, "Hello");
    assert_eq!(first.original_language, Language::English);
    assert_eq!(first.translated_text, "Hola");
    assert_eq!(first.sender_id, user.id);

    // An unknown phrase degrades to a marked fallback, never an error.
    let second = session.send("See you tomorrow").await.unwrap();
    assert!(second.translated_text.contains("See you tomorrow"));
    assert!(second.id > first.id);

    // The log is ordered and stable across reads.
    let listed = session.messages().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], first);
    assert_eq!(listed[1], second);
    assert_eq!(session.messages().await.unwrap(), listed);

    // Both appends were announced to subscribers, in order.
    for expected in [&first, &second] {
        match events.recv().await.unwrap() {
            Event::MessageAppended(msg) => assert_eq!(&msg, expected),
            other => panic!("expected MessageAppended, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn failed_sign_in_yields_no_principal() {
    let identity = LocalIdentity::new();
    identity
        .sign_up("bruno@example.com", "contraseña", Language::Spanish)
        .await
        .unwrap();

    // Without a Principal there is nothing to construct a session from.
    let err = identity
        .sign_in("bruno@example.com", "not-the-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn spanish_user_round_trips_known_phrases() {
    let identity = LocalIdentity::new();
    identity
        .sign_up("carmen@example.com", "secreta1", Language::Spanish)
        .await
        .unwrap();
    let user = identity
        .sign_in("carmen@example.com", "secreta1")
        .await
        .unwrap();

    let session = ChatSession::new(
        user,
        Language::English,
        Arc::new(MemoryStore::new()),
        Arc::new(DictionaryTranslator::with_delay(Duration::ZERO)),
        Arc::new(EventBus::new()),
    );

    let stored = session.send("Hola").await.unwrap();
    assert_eq!(stored.original_language, Language::Spanish);
    assert_eq!(stored.translated_text, "Hello");
}
