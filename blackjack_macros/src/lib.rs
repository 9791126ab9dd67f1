use proc_macro::TokenStream as TokenStream1;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{parse_macro_input, punctuated::Punctuated, Ident, ImplItemFn, Token};

/// This macro is added before a method of `Table` in the impl block.
/// Use this macro to first check if the current round phase is one of the
/// phases in the attribute.
///
/// For example, `#[allowed_phase(PlayerTurn)]` makes a method first check if
/// `self.phase` is `RoundPhase::PlayerTurn`. If not, the method returns
/// `TableError::WrongPhase` before doing anything else. Several phases may be
/// listed, separated by commas.
///
/// The method must return `Result<_, TableError>` and both `RoundPhase` and
/// `TableError` must be in scope.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let phases = parse_macro_input!(attr with Punctuated::<Ident, Token![,]>::parse_terminated);
    let mut ast = parse_macro_input!(item as ImplItemFn);
    if phases.is_empty() {
        return syn::Error::new(Span::call_site(), "allowed_phase needs at least one phase")
            .to_compile_error()
            .into();
    }

    let phases: Vec<Ident> = phases.into_iter().collect();
    let guard = phase_guard(&ast.sig.ident.to_string(), &phases);
    let guard: syn::Stmt = syn::parse_quote!(#guard);
    ast.block.stmts.insert(0, guard);
    ast.into_token_stream().into()
}

fn phase_guard(function_name: &str, phases: &[Ident]) -> TokenStream2 {
    let expected = phases
        .iter()
        .map(|phase| phase.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    quote! {
        if !matches!(self.phase, #(RoundPhase::#phases)|*) {
            return Err(TableError::WrongPhase {
                action: #function_name,
                expected: #expected,
                actual: self.phase,
            });
        }
    }
}
