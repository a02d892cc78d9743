//! Crate not intended for direct use.
//! Use `::coyield` instead.
#![allow(nonstandard_style, unused_imports)]

use ::core::{
    mem,
    ops::Not as _,
};
use ::proc_macro::{
    TokenStream,
};
use ::proc_macro2::{
    Span,
    TokenStream as TokenStream2,
};
use ::quote::{
    quote,
    ToTokens,
};
use ::syn::{*,
    ext::IdentExt,
    parse::{Parse, Parser, ParseStream},
    Result, // Explicitly shadow it
    spanned::Spanned,
};

mod utils;

/// Turns a function into a generator factory.
///
/// The function body gets access to the following local macros:
///
///   - `yield_!(value)` suspends the generator with `value`, and evaluates to
///     the `Option<Resume>` the consumer resumes it with. Thrown errors and
///     the close signal are propagated with `?`.
///
///   - `try_yield_!(value)` does the same but does not propagate anything:
///     it evaluates to the whole `GenResult<Option<Resume>, Thrown>`.
///
///   - `yield_from_!(generator)` delegates to an (`Unpin`) sub-generator
///     until it completes, and evaluates to its return value. Its errors are
///     propagated with `?`, unless `try_yield_from_!` is used instead.
///
/// The parameters are either a single yield type, as in `#[generator(u8)]`,
/// or any combination of `yield(Type)` (mandatory), `resume(Type)` (defaults
/// to `()`) and `throw(Type)` (defaults to `Infallible`).
///
/// The function must return a `GenResult<Return, Thrown>`, with the same
/// `Thrown` type as the `throw(...)` parameter.
#[proc_macro_attribute] pub
fn generator (
    attrs: TokenStream,
    input: TokenStream,
) -> TokenStream
{
    generator_impl(attrs.into(), input.into())
        .map(|ret| {
            #[cfg(feature = "verbose-expansions")] {
                utils::pretty_print_tokenstream(&ret);
            }
            ret
        })
        .unwrap_or_else(|err| {
            let mut errors =
                err .into_iter()
                    .map(|err| Error::new(
                        err.span(),
                        format_args!("`#[coyield::generator]`: {}", err),
                    ))
            ;
            let mut err = match errors.next() {
                | Some(err) => err,
                | None => return TokenStream2::new(),
            };
            errors.for_each(|cur| err.combine(cur));
            err.to_compile_error()
        })
        .into()
}

struct Params {
    yield_ty: Type,
    resume_ty: Type,
    throw_ty: Type,
}

impl Parse for Params {
    fn parse (input: ParseStream<'_>)
      -> Result<Params>
    {
        let keyed = {
            let fork = input.fork();
            fork.call(Ident::parse_any)
                .map_or(false, |ident| {
                    ["yield", "resume", "throw"].iter().any(|&key| ident == key)
                    && fork.peek(token::Paren)
                })
        };
        if keyed.not() {
            if input.is_empty() {
                return Err(input.error("missing yield type"));
            }
            let yield_ty: Type = input.parse()?;
            let _: Option<Token![,]> = input.parse()?;
            return Ok(Params {
                yield_ty,
                resume_ty: parse_quote!( () ),
                throw_ty: parse_quote!( ::core::convert::Infallible ),
            });
        }
        let mut yield_ty = None;
        let mut resume_ty = None;
        let mut throw_ty = None;
        while input.is_empty().not() {
            let key = input.call(Ident::parse_any)?;
            let slot = match &*key.to_string() {
                | "yield" => &mut yield_ty,
                | "resume" => &mut resume_ty,
                | "throw" => &mut throw_ty,
                | _ => return Err(Error::new_spanned(
                    &key,
                    "expected `yield`, `resume` or `throw`",
                )),
            };
            let contents;
            parenthesized!(contents in input);
            let ty: Type = contents.parse()?;
            if slot.replace(ty).is_some() {
                return Err(Error::new_spanned(
                    &key,
                    format_args!("duplicate `{}` parameter", key),
                ));
            }
            if input.is_empty().not() {
                let _: Token![,] = input.parse()?;
            }
        }
        Ok(Params {
            yield_ty: yield_ty.ok_or_else(|| Error::new(
                Span::call_site(),
                "missing `yield(...)` parameter",
            ))?,
            resume_ty: resume_ty.unwrap_or_else(|| parse_quote!( () )),
            throw_ty: throw_ty.unwrap_or_else(|| parse_quote!(
                ::core::convert::Infallible
            )),
        })
    }
}

fn generator_impl (
    params: TokenStream2,
    input: TokenStream2,
) -> Result<TokenStream2>
{
    let Params { yield_ty, resume_ty, throw_ty } = parse2(params)?;

    let mut function: ItemFn = parse2(input)?;
    let ItemFn {
        ref mut block,
        ref mut sig,
        ..
    } = function;

    if let Some(asyncness) = &sig.asyncness {
        return Err(Error::new_spanned(
            asyncness,
            "generator functions cannot be `async`",
        ));
    }
    if let ReturnType::Default = sig.output {
        return Err(Error::new_spanned(
            &sig.ident,
            "expected a `-> GenResult<...>` return type",
        ));
    }
    check_thrown_type(&sig.output, &throw_ty)?;
    if let Some(receiver) =
        sig .inputs
            .iter()
            .find(|&fn_arg| matches!(*fn_arg, FnArg::Receiver(_)))
    {
        return Err(Error::new_spanned(
            receiver,
            "`self` receivers are not supported",
        ));
    }

    // Update block to generate the `yield_!`-family macros.
    {
        *block = parse_quote!({
            #[allow(unused_macros)]
            macro_rules! yield_ {( $value:expr $(,)? ) => (
                __yield_slot__.suspend($value).await?
            )}
            #[allow(unused_macros)]
            macro_rules! try_yield_ {( $value:expr $(,)? ) => (
                __yield_slot__.suspend($value).await
            )}
            #[allow(unused_macros)]
            macro_rules! yield_from_ {( $generator:expr $(,)? ) => (
                __yield_slot__.delegate($generator).await?
            )}
            #[allow(unused_macros)]
            macro_rules! try_yield_from_ {( $generator:expr $(,)? ) => (
                __yield_slot__.delegate($generator).await
            )}

            #block
        });
    }

    // Handle the signature
    {
        sig.asyncness = parse_quote!( async );

        let (pats, tys): (Vec<_>, Vec<_>) =
            mem::take(&mut sig.inputs)
                .into_iter()
                .filter_map(|fn_arg| match fn_arg {
                    | FnArg::Receiver(_) => None,
                    | FnArg::Typed(PatType { pat, ty, .. }) => Some((pat, ty)),
                })
                .unzip()
        ;
        sig.inputs = parse_quote!(
            __yield_slot__: ::coyield::__::__Internals_YieldSlot_DoNotUse__<
                '_,
                #yield_ty,
                #resume_ty,
                #throw_ty,
            >,
            ( #(#pats ,)* ): ( #(#tys ,)* ),
        );
    }

    Ok(function.into_token_stream())
}

/// `-> GenResult<R, E>` must name the same `E` as `throw(E)`: a body's `?`
/// can only forward the errors the generator may be thrown.
///
/// Only the last path segment is compared, so that differently qualified
/// paths to the same type are accepted. Other return types (aliases, ...) are
/// left to the type checker.
fn check_thrown_type (
    output: &'_ ReturnType,
    throw_ty: &'_ Type,
) -> Result<()>
{
    fn last_segment (ty: &'_ Type)
      -> String
    {
        match ty {
            | Type::Path(TypePath { qself: None, path }) => {
                path.segments
                    .last()
                    .map(|segment| segment.into_token_stream().to_string())
                    .unwrap_or_default()
            },
            | Type::Paren(TypeParen { elem, .. })
            | Type::Group(TypeGroup { elem, .. })
            => {
                last_segment(elem)
            },
            | _ => ty.into_token_stream().to_string(),
        }
    }

    let ret_ty = match output {
        | ReturnType::Type(_, ty) => &**ty,
        | ReturnType::Default => return Ok(()),
    };
    let gen_result = match ret_ty {
        | Type::Path(TypePath { qself: None, path }) => match path.segments.last() {
            | Some(segment) if segment.ident == "GenResult" => segment,
            | _ => return Ok(()),
        },
        | _ => return Ok(()),
    };
    let args = match &gen_result.arguments {
        | PathArguments::AngleBracketed(args) => args,
        | _ => return Ok(()),
    };
    let error_ty =
        args.args
            .iter()
            .filter_map(|arg| match arg {
                | GenericArgument::Type(ty) => Some(ty),
                | _ => None,
            })
            .nth(1)
    ;
    let (found, spanned): (_, &dyn ToTokens) = match error_ty {
        | Some(ty) => (last_segment(ty), ty),
        | None => ("Infallible".to_owned(), ret_ty),
    };
    if found == last_segment(throw_ty) {
        return Ok(());
    }
    Err(Error::new_spanned(
        spanned,
        format!(
            "the error type of `GenResult` must match `throw(...)`: \
            expected `GenResult<_, {}>`",
            throw_ty.into_token_stream(),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params (input: TokenStream2)
      -> Result<Params>
    {
        parse2(input)
    }

    #[test]
    fn shorthand_yield_type ()
    {
        let Params { yield_ty, resume_ty, .. } = params(quote!(u8)).unwrap();
        assert_eq!(yield_ty.into_token_stream().to_string(), "u8");
        assert_eq!(resume_ty.into_token_stream().to_string(), "()");
    }

    #[test]
    fn keyed_parameters ()
    {
        let Params { yield_ty, resume_ty, throw_ty } =
            params(quote!(resume(i64), yield(Vec<u8>), throw(MyError))).unwrap()
        ;
        assert_eq!(yield_ty.into_token_stream().to_string(), "Vec < u8 >");
        assert_eq!(resume_ty.into_token_stream().to_string(), "i64");
        assert_eq!(throw_ty.into_token_stream().to_string(), "MyError");
    }

    #[test]
    fn rejects_bad_parameters ()
    {
        assert!(params(quote!()).is_err());
        assert!(params(quote!(resume(u8))).is_err());
        assert!(params(quote!(yield(u8), yield(u16))).is_err());
    }

    #[test]
    fn rejects_async_and_missing_return_type ()
    {
        assert!(generator_impl(quote!(u8), quote!(async fn f () -> R {})).is_err());
        assert!(generator_impl(quote!(u8), quote!(fn f () {})).is_err());
        assert!(generator_impl(quote!(u8), quote!(fn f (&self) -> R {})).is_err());
    }

    #[test]
    fn error_type_must_match_the_thrown_type ()
    {
        // Defaulted `throw`, defaulted error type.
        assert!(generator_impl(quote!(u8), quote!(fn f () -> GenResult<()> {})).is_ok());
        assert!(
            generator_impl(
                quote!(yield(u8), throw(Foo)),
                quote!(fn f () -> GenResult<(), Foo> {}),
            ).is_ok()
        );
        assert!(
            generator_impl(
                quote!(yield(u8), throw(crate::Foo)),
                quote!(fn f () -> ::coyield::GenResult<(), Foo> {}),
            ).is_ok()
        );
        // Forgotten error type.
        let error =
            generator_impl(
                quote!(yield(i64), resume(i64), throw(Foo)),
                quote!(fn f () -> GenResult<()> {}),
            ).unwrap_err()
        ;
        assert!(error.to_string().contains("GenResult<_, Foo>"));
        // Mismatched one.
        assert!(
            generator_impl(
                quote!(yield(u8), throw(Foo)),
                quote!(fn f () -> GenResult<(), Bar> {}),
            ).is_err()
        );
        assert!(
            generator_impl(
                quote!(u8),
                quote!(fn f () -> GenResult<(), Foo> {}),
            ).is_err()
        );
        // Not a `GenResult`: left to the type checker.
        assert!(generator_impl(quote!(yield(u8), throw(Foo)), quote!(fn f () -> R {})).is_ok());
    }
}
