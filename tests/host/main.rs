mod room;

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use zeroin::{Emits, Emittable, Emitter, Listener, WithEmitter};

use room::{greeting, Channel, Lobby, Room, Typed};

// =============================================================================
// #[derive(Emits)]
// =============================================================================

#[test]
fn derived_host_delegates_to_emitter_field() {
    let room = Room {
        name: "kitchen".to_string(),
        ..Room::default()
    };
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    room.on(
        "say",
        &Listener::new(move |args: &[Value]| log.lock().unwrap().push(greeting(args))),
    );

    assert!(room.emit("say", &[json!("hello"), json!("world")]));
    assert_eq!(*seen.lock().unwrap(), vec!["hello world"]);
    assert_eq!(room.name, "kitchen");
    assert_eq!(room.emitter.listener_count("say"), 1);
}

#[test]
fn derived_host_chains_like_the_emitter() {
    let room = Room::default();
    let listener = Listener::new(|_args: &[Value]| {});

    let names = room
        .on("a", &listener)
        .once("b", &listener)
        .prepend_listener("a", &listener)
        .event_names();

    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(room.listener_count("a"), 2);

    room.remove_all_listeners(None);
    assert!(room.event_names().is_empty());
}

#[test]
fn marked_field_is_used() {
    let lobby = Lobby::new(8);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    lobby.on(
        zeroin::WILDCARD,
        &Listener::new(move |args: &[String]| log.lock().unwrap().push(args.to_vec())),
    );
    lobby.emit("join", &["ana".to_string()]);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec!["join".to_string(), "ana".to_string()]]
    );
    assert_eq!(lobby.capacity, 8);
    assert_eq!(lobby.events.event_names(), vec!["*"]);
}

#[test]
fn tuple_struct_host() {
    let channel = Channel("general", Emitter::new());
    let mut next = channel.on_next("message");

    channel.emit("message", &[json!("hi")]);

    assert_eq!(
        next.try_resolve(),
        Ok(Some(zeroin::Payload::Single(json!("hi"))))
    );
    assert_eq!(channel.0, "general");
}

#[test]
fn generic_host_uses_field_payload_type() {
    let typed: Typed<String> = Typed {
        emitter: Emitter::new(),
    };
    let listener = Listener::new(|args: &[String]| assert_eq!(args, &["x".to_string()]));

    typed.once("t", &listener);

    assert!(typed.emit("t", &["x".to_string()]));
    assert!(!typed.emit("t", &["y".to_string()]));
}

// =============================================================================
// WithEmitter composition
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Config {
    retries: u32,
}

#[test]
fn arbitrary_value_gains_emitter_capability() {
    let mut wrapped = Config { retries: 3 }.with_emitter();
    let seen = Arc::new(Mutex::new(0));
    let total = Arc::clone(&seen);

    wrapped.on(
        "retry",
        &Listener::new(move |args: &[Value]| {
            *total.lock().unwrap() += args[0].as_u64().unwrap_or(0);
        }),
    );

    wrapped.retries += 1;
    let retries = wrapped.retries;
    wrapped.emit("retry", &[json!(retries)]);

    assert_eq!(*seen.lock().unwrap(), 4);
    assert_eq!(wrapped.into_host(), Config { retries: 4 });
}

#[test]
fn wrapped_hosts_do_not_share_registries() {
    let first: WithEmitter<Config> = WithEmitter::new(Config { retries: 0 });
    let second: WithEmitter<Config> = WithEmitter::new(Config { retries: 0 });

    first.on("x", &Listener::new(|_args: &[Value]| {}));

    assert_eq!(first.listener_count("x"), 1);
    assert_eq!(second.listener_count("x"), 0);
    assert!(!second.emit("x", &[]));
}
