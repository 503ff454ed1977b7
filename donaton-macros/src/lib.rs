//! Proc-Macros for the DonatonUIS dependency injection container

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod di;

/// Implements the `Inject` trait by resolving every field from the container
///
/// Fields are resolved in declaration order through `FromContainer`,
/// so a field may be an `Arc<dyn Trait>`, an `Option<Arc<dyn Trait>>`, the `Container` itself
/// or any other type implementing `FromContainer`.
///
/// Field attributes:
/// - `#[inject(default)]` falls back to `Default::default()` if the field can't be resolved
/// - `#[inject(default = expr)]` falls back to `expr` if the field can't be resolved
/// - `#[inject(skip)]` never resolves the field and uses `Default::default()`
///
/// # Example
/// ```ignore
/// use std::sync::{Arc, Mutex};
/// use donaton_di::Inject;
///
/// #[derive(Inject)]
/// struct AuthService {
///     users: Arc<dyn UserRepository>,
///     #[inject(default)]
///     audit: Option<Arc<dyn AuditLog>>,
///     #[inject(skip)]
///     tokens: Mutex<Vec<String>>,
/// }
/// ```
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    di::expand_inject(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
