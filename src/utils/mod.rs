#[macro_use]
pub(in crate)
mod macros;

pub(in crate)
mod prelude;

pub(in crate)
use self::cell_option::CellOption;
mod cell_option;

pub(in crate)
use self::poll_fn::poll_fn;
mod poll_fn;
