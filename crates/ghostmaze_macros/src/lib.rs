use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, LitInt, Pat, Signature};

/// Time a function or system when the `perf_stats` feature is enabled.
///
/// The body runs with a guard in scope that reports the elapsed wall time on
/// drop through `bevy::log::info!`. Without the feature the attribute expands
/// to the unchanged function.
///
/// A parameter named `tick` whose type mentions `SimTick` turns on periodic
/// reporting: every 300th tick is logged even when it was fast.
///
/// # Example
/// ```ignore
/// #[profile(500)] // threshold in microseconds, default 1000
/// pub fn advance_ghost(mut chase: ResMut<ChaseController>, tick: Res<SimTick>) {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_us: u128 = if attr.is_empty() {
        1000
    } else {
        match syn::parse::<LitInt>(attr).and_then(|lit| lit.base10_parse::<u128>()) {
            Ok(value) => value,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name = sig.ident.to_string();

    let tick_value = match tick_argument(sig) {
        Some(ident) => quote! { Some(#ident.0) },
        None => quote! { None },
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_guard = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                    tick: Option<u64>,
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        let periodic = self.tick.is_some_and(|t| t % 300 == 0);
                        if elapsed.as_micros() > #threshold_us || periodic {
                            bevy::log::info!("[PERF] {}: {:?}", self.name, elapsed);
                        }
                    }
                }
                ProfileGuard {
                    name: #fn_name,
                    start: std::time::Instant::now(),
                    tick: #tick_value,
                }
            };

            #block
        }
    };

    output.into()
}

/// Find a `tick: Res<SimTick>` style parameter.
fn tick_argument(sig: &Signature) -> Option<syn::Ident> {
    sig.inputs.iter().find_map(|arg| {
        let FnArg::Typed(pat_type) = arg else {
            return None;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return None;
        };
        let ty = &pat_type.ty;
        let type_str = quote!(#ty).to_string();
        (pat_ident.ident == "tick" && type_str.contains("SimTick")).then(|| pat_ident.ident.clone())
    })
}
