//! A countdown that can be told how much to count down by.

use ::coyield::{prelude::*, Step};

#[derive(Debug, ::thiserror::Error)]
#[error("{0}")]
struct Foo(&'static str);

#[generator(yield(i64), resume(i64), throw(Foo))]
fn countdown (start: i64)
  -> GenResult<(), Foo>
{
    let mut value = start;
    while value >= 0 {
        let delta = yield_!(value).unwrap_or(1);
        value -= delta;
    }
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

fn show (step: Step<i64, (), Foo>)
{
    match step {
        | Ok(GeneratorState::Yielded(value)) => println!("{}", value),
        | Ok(GeneratorState::Returned(())) => println!("(done)"),
        | Err(error) => println!("error: {}", error),
    }
}

fn main ()
{
    init_logging();

    mk_gen!(let mut coroutine = countdown(10));
    show(coroutine.as_mut().advance());
    show(coroutine.as_mut().advance());
    show(coroutine.as_mut().send(5));
    show(coroutine.as_mut().advance());
    // The body does not handle it: it comes right back.
    if let Err(GenError::Raised(error)) = coroutine.as_mut().throw(Foo("foo")) {
        println!("generator re-threw exception: {}", error);
    }
    println!("status: {:?}", coroutine.status());
}
