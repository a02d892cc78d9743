//! Paths the macros expand to. Not part of the public API.

pub use {
    ::core,
    crate::{
        generator_fn::internals::YieldSlot as __Internals_YieldSlot_DoNotUse__,
    },
};
