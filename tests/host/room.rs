use serde_json::Value;
use zeroin::{Emits, Emitter};

/// Host whose emitter lives in a field with the conventional name.
#[derive(Emits, Default)]
pub struct Room {
    pub name: String,
    pub emitter: Emitter,
}

/// Host that marks a differently-named field.
#[derive(Emits)]
pub struct Lobby {
    pub capacity: usize,
    #[emits]
    pub events: Emitter<String>,
}

impl Lobby {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Emitter::new(),
        }
    }
}

/// Tuple struct host.
#[derive(Emits)]
pub struct Channel(pub &'static str, #[emits] pub Emitter);

/// Generic host: the payload type follows the field.
#[derive(Emits)]
pub struct Typed<T>
where
    T: Clone + From<String> + Send + 'static,
{
    pub emitter: Emitter<T>,
}

pub fn greeting(args: &[Value]) -> String {
    args.iter()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
