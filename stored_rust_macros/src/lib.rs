mod storable;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Storable)] derive macro
// ============================================================================

/// Derive macro for the `Storable` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Storable)]
/// struct TodoItem {
///     #[storable(id)]
///     pub id: String,
///     #[storable(partition_key)]
///     pub list: String,
///     pub task: String,
///     #[storable(last_update)]
///     pub last_update: Option<SystemTime>,
/// }
/// ```
///
/// - `#[storable(id)]` marks the field used as the unique identifier.
///   If omitted, defaults to a field named `id`. The field must deref to
///   `str`.
/// - `#[storable(partition_key)]` marks the field whose display form is
///   the partition key. If omitted, the trait default derives the key
///   from the id.
/// - `#[storable(last_update)]` marks the `Option<SystemTime>` field
///   holding the stamped timestamp. If omitted, defaults to a field
///   named `last_update`.
#[proc_macro_derive(Storable, attributes(storable))]
pub fn derive_storable(input: TokenStream) -> TokenStream {
    storable::derive_storable(input)
}
