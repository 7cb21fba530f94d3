//! Procedural macros for the `dollo` crate.
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;

mod log;

/// Logs at the `Info` level; see the `dollo::log` module.
#[proc_macro]
pub fn info(input: TokenStream) -> TokenStream {
    expand_log("Info", input)
}

/// Logs at the `Verbose` level; see the `dollo::log` module.
#[proc_macro]
pub fn verbose(input: TokenStream) -> TokenStream {
    expand_log("Verbose", input)
}

/// Logs at the `Debug` level; see the `dollo::log` module.
#[proc_macro]
pub fn debug(input: TokenStream) -> TokenStream {
    expand_log("Debug", input)
}

/// Logs at the `Trace` level; see the `dollo::log` module.
#[proc_macro]
pub fn trace(input: TokenStream) -> TokenStream {
    expand_log("Trace", input)
}

fn expand_log(level: &'static str, input: TokenStream) -> TokenStream {
    let parser = |stream: syn::parse::ParseStream| log::log(level, stream);
    match parser.parse(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn crate_path(name: &str) -> syn::Result<proc_macro2::TokenStream> {
    let found_crate = proc_macro_crate::crate_name(name)
        .map_err(|err| syn::Error::new(proc_macro2::Span::call_site(), err.to_string()))?;
    Ok(match found_crate {
        proc_macro_crate::FoundCrate::Itself => quote!(crate),
        proc_macro_crate::FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!( ::#ident )
        }
    })
}
