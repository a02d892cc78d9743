//! A countdown, consumed in all the usual ways.

use ::coyield::prelude::*;

#[generator(yield(i64))]
fn countdown (start: i64)
  -> GenResult<()>
{
    let mut value = start;
    while value >= 0 {
        yield_!(value);
        value -= 1;
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

fn main ()
{
    init_logging();

    mk_gen!(let mut generator = countdown(4));
    println!("generator status: {:?}", generator.status());
    loop {
        match generator.as_mut().advance() {
            | Ok(GeneratorState::Yielded(value)) => {
                println!("advance() yielded: {}", value);
            },
            | Ok(GeneratorState::Returned(())) => {
                println!("advance() returned: the countdown is over");
            },
            | Err(error) if error.is_exhausted() => {
                println!("advance() reported: {}", error);
                break;
            },
            | Err(error) => panic!("{}", error),
        }
    }

    mk_gen!(let values = countdown(4));
    for value in values {
        match value {
            | Ok(value) => println!("for loop value = {}", value),
            | Err(error) => println!("error: {}", error),
        }
    }

    mk_gen!(let values = box countdown(4));
    let values: GenResult<Vec<_>> = values.collect();
    println!("iterated values: {:?}", values);

    mk_gen!(let values = box countdown(4));
    let scaled: GenResult<Vec<_>> = values.map(|x| x.map(|x| x * 10)).collect();
    println!("mapped values: {:?}", scaled);
}
