mod emits;

use proc_macro::TokenStream;

/// Derive `zeroin::Emits` by delegating to an emitter field.
///
/// The field named `emitter` is used unless another field is marked
/// `#[emits]`. Tuple structs must mark their field.
///
/// ```ignore
/// #[derive(Emits)]
/// struct Room {
///     name: String,
///     #[emits]
///     events: Emitter,
/// }
///
/// room.on("joined", &listener);
/// room.emit("joined", &[json!("ana")]);
/// ```
#[proc_macro_derive(Emits, attributes(emits))]
pub fn derive_emits(input: TokenStream) -> TokenStream {
    emits::derive_emits(input)
}
