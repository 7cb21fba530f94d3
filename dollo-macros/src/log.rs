//! Expansion of the log macros.
//!
//! Grammar: `level!(ctx, item, ...)` where `ctx` is any expression with a
//! `logger()` method and each item is a string literal (a static message
//! fragment), `name = expr` (a value labeled `name:`), `= expr` (a value
//! labeled by its own source text) or a bare expression (an unlabeled
//! value).
use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{parse::ParseStream, Expr, ExprLit, Ident, Lit, LitStr, Token};

use crate::crate_path;

enum LogItem {
    Message(String),
    Value(Expr),
}

fn as_string_literal(expr: &Expr) -> Option<String> {
    if let Expr::Lit(ExprLit {
        attrs,
        lit: Lit::Str(lit_str),
    }) = expr
    {
        if attrs.is_empty() {
            return Some(lit_str.value());
        }
    }
    None
}

/// Parses the item list, labeling values and merging adjacent message
/// fragments into single space-joined strings.
fn parse_items(input: ParseStream) -> syn::Result<Vec<LogItem>> {
    let mut items: Vec<LogItem> = vec![];

    let push_message = |items: &mut Vec<LogItem>, text: String| {
        if let Some(LogItem::Message(last)) = items.last_mut() {
            last.push(' ');
            last.push_str(&text);
        } else {
            items.push(LogItem::Message(text));
        }
    };

    while !input.is_empty() {
        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let expr: Expr = input.parse()?;
            push_message(&mut items, format!("{}:", expr.to_token_stream()));
            items.push(LogItem::Value(expr));
        } else if (input.peek(Ident) || input.peek(LitStr)) && input.peek2(Token![=]) {
            let label = if input.peek(Ident) {
                input.parse::<Ident>()?.to_string()
            } else {
                input.parse::<LitStr>()?.value()
            };
            input.parse::<Token![=]>()?;
            let expr: Expr = input.parse()?;
            push_message(&mut items, format!("{label}:"));
            items.push(LogItem::Value(expr));
        } else {
            let expr: Expr = input.parse()?;
            match as_string_literal(&expr) {
                Some(text) => push_message(&mut items, text),
                None => items.push(LogItem::Value(expr)),
            }
        }

        if !input.is_empty() {
            input.parse::<Token![,]>()?;
        }
    }

    Ok(items)
}

pub fn log(level: &str, input: ParseStream) -> syn::Result<TokenStream> {
    let ctx: Expr = input.parse()?;
    input.parse::<Token![,]>()?;

    let items = parse_items(input)?;

    let target = Ident::new("target", Span::mixed_site());
    let mut steps = TokenStream::default();
    for item in items {
        match item {
            LogItem::Message(msg) => steps.extend(quote! { #target.add_message(#msg); }),
            LogItem::Value(expr) => steps.extend(quote! { #target.add_value(&(#expr)); }),
        }
    }

    let dollo = crate_path("dollo")?;
    let level = Ident::new(level, Span::call_site());
    Ok(quote! {{
        use #dollo::log::HasLogger;
        (#ctx).logger().log(#dollo::log::LogLevel::#level, |#target| { #steps })
    }})
}
