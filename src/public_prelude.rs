//! The crate prelude: reexport the most essential utilities so that blob
//! `use`-ing them should enable the most straight-forward usage.

pub use ::coyield_proc_macros::generator;
pub use crate::{
    CallBoxed as _,
    GenError,
    GenResult,
    Generator,
    GeneratorExt as _,
    GeneratorState,
    mk_gen,
    stack_pinned,
    Status,
};
pub use ::core::pin::Pin;
