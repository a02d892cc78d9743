pub(in crate)
use {
    ::core::{
        convert::Infallible,
        future::Future,
        marker::PhantomPinned,
        pin::Pin,
        task::{
            Context,
            Poll,
        },
    },
    crate::{
        error::{
            GenError,
            GenResult,
        },
        generator::{
            Generator,
            GeneratorState,
            Status,
            Step,
        },
        generator_fn::{
            GeneratorFn,
        },
        utils::{
            CellOption,
            macros,
            poll_fn,
        },
    },
};
