//! Yielding a sub-generator _vs._ delegating to it.

use ::coyield::prelude::*;
use ::core::{convert::Infallible, fmt};

type Sequence = Pin<Box<dyn Generator<Yield = i64, Return = (), Thrown = Infallible>>>;

#[generator(i64)]
fn subgenerator (start: i64)
  -> GenResult<()>
{
    let mut value = start;
    while value >= 0 {
        yield_!(value);
        value -= 1;
    }
    Ok(())
}

enum Item {
    Value(i64),
    Sequence(Sequence),
}

impl fmt::Debug for Item {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        match self {
            | Self::Value(value) => fmt::Debug::fmt(value, f),
            | Self::Sequence(sequence) => write!(
                f, "<generator ({:?})>", sequence.status(),
            ),
        }
    }
}

#[generator(Item)]
fn countdown (start: i64)
  -> GenResult<()>
{
    if start >= 0 {
        yield_!(Item::Value(start));
    }
    yield_!(Item::Sequence(subgenerator.call_boxed((start - 1, ))));
    Ok(())
}

#[generator(i64)]
fn countdown_fixed (start: i64)
  -> GenResult<()>
{
    if start >= 0 {
        yield_!(start);
    }
    yield_from_!(subgenerator.call_boxed((start - 1, )));
    Ok(())
}

fn init_logging ()
{
    use ::tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    ;
    ::tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main ()
{
    init_logging();

    mk_gen!(let items = box countdown(4));
    let items: GenResult<Vec<Item>> = items.collect();
    println!("{:?}", items);

    mk_gen!(let values = box countdown_fixed(4));
    let values: GenResult<Vec<i64>> = values.collect();
    println!("{:?}", values);
}
