//! Procedural macros for testing record codecs.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, AttributeArgs, Ident, ItemFn, Lit, Meta, NestedMeta};

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Run a test function with a tracing subscriber that writes to the test output.
///
/// The log level defaults to `DEBUG` and can be set with `level = "INFO"` (any of `TRACE`,
/// `DEBUG`, `INFO`, `WARN` or `ERROR`). The subscriber is only installed for the duration of
/// the test, so tests running in parallel do not interfere.
///
/// Crates using this attribute must depend on `tracing` and `tracing-subscriber`.
///
/// # Example
/// ```rust,ignore
/// use typesupport_macros::test_traced;
/// use tracing::info;
///
/// #[test_traced(level = "INFO")]
/// fn test_info_level() {
///     info!("visible when the test fails or runs with --nocapture");
///     assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as AttributeArgs);
    let input = parse_macro_input!(item as ItemFn);

    let level = match parse_level(&args) {
        Ok(level) => level,
        Err(err) => return err.to_compile_error().into(),
    };
    let level = Ident::new(&level, Span::call_site());

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let subscriber = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::tracing::Level::#level)
                .with_line_number(true)
                .finish();
            let dispatcher = ::tracing::Dispatch::new(subscriber);
            ::tracing::dispatcher::with_default(&dispatcher, || #block)
        }
    };
    TokenStream::from(expanded)
}

fn parse_level(args: &[NestedMeta]) -> syn::Result<String> {
    let mut level = String::from("DEBUG");
    for arg in args {
        let lit = match arg {
            NestedMeta::Meta(Meta::NameValue(pair)) if pair.path.is_ident("level") => &pair.lit,
            NestedMeta::Lit(lit) => lit,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected `level = \"...\"`",
                ))
            }
        };
        let Lit::Str(value) = lit else {
            return Err(syn::Error::new_spanned(lit, "level must be a string"));
        };
        let value = value.value().to_uppercase();
        if !LEVELS.contains(&value.as_str()) {
            return Err(syn::Error::new_spanned(
                lit,
                format!("invalid level, expected one of {}", LEVELS.join(", ")),
            ));
        }
        level = value;
    }
    Ok(level)
}
