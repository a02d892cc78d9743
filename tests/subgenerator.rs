//! Generators built out of other generators.

use ::coyield::prelude::*;
use ::core::convert::Infallible;

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

/// What the non-delegating countdown yields: either a value of its own, or
/// the (unstarted) generator that takes over from there.
enum Item {
    Value(i64),
    Sequence(Sequence),
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

#[test]
fn delegation_flattens ()
{
    mk_gen!(let values = countdown_fixed(4));
    assert_eq!(
        values.collect::<Result<Vec<_>, _>>().unwrap(),
        [4, 3, 2, 1, 0],
    );
}

#[test]
fn without_delegation_the_sub_generator_is_yielded ()
{
    mk_gen!(let mut outer = countdown(4));
    let first = outer.as_mut().advance().unwrap();
    assert!(matches!(first, GeneratorState::Yielded(Item::Value(4))));
    let sequence = match outer.as_mut().advance().unwrap() {
        | GeneratorState::Yielded(Item::Sequence(sequence)) => sequence,
        | _ => panic!("expected a sub-generator"),
    };
    // Yielding it did not start it.
    assert_eq!(sequence.status(), Status::Created);
    assert!(matches!(outer.as_mut().advance(), Ok(GeneratorState::Returned(()))));

    // It can be consumed later on, on its own.
    assert_eq!(
        sequence.boxed_gen_into_iter().collect::<Result<Vec<_>, _>>().unwrap(),
        [3, 2, 1, 0],
    );
}

#[test]
fn negative_start ()
{
    mk_gen!(let values = box countdown_fixed(-1));
    assert_eq!(values.count(), 0);

    // The (empty) sub-generator is still yielded.
    mk_gen!(let mut items = countdown(-1));
    match items.as_mut().advance().unwrap() {
        | GeneratorState::Yielded(Item::Sequence(sequence)) => {
            assert_eq!(sequence.count(), 0);
        },
        | _ => panic!("expected a sub-generator"),
    }
    assert!(matches!(items.as_mut().advance(), Ok(GeneratorState::Returned(()))));
}

/// `countdown(n)` and `countdown_fixed(n)` count down from `n` to `0`
/// included, for any `n`, with and without delegation alike.
#[test]
fn both_countdowns_agree_with_a_reversed_range ()
{
    for n in -2_i64 ..= 8 {
        let expected = (0 ..= n).rev().collect::<Vec<i64>>();

        let sub = subgenerator.call_boxed((n, ));
        assert_eq!(
            sub.collect::<Result<Vec<_>, _>>().unwrap(),
            expected,
            "subgenerator({})", n,
        );

        mk_gen!(let fixed = box countdown_fixed(n));
        assert_eq!(
            fixed.collect::<Result<Vec<_>, _>>().unwrap(),
            expected,
            "countdown_fixed({})", n,
        );

        // Without delegation, the consumer flattens the sub-generator itself.
        mk_gen!(let items = box countdown(n));
        let mut flattened = vec![];
        for item in items {
            match item.unwrap() {
                | Item::Value(value) => flattened.push(value),
                | Item::Sequence(sequence) => {
                    flattened.extend(sequence.map(Result::unwrap));
                },
            }
        }
        assert_eq!(flattened, expected, "countdown({})", n);
    }
}

#[test]
fn zero_start_delegates_to_an_empty_sub_generator ()
{
    let mut fixed = countdown_fixed.call_boxed((0, ));
    assert_eq!(fixed.as_mut().advance().unwrap(), GeneratorState::Yielded(0));
    assert_eq!(fixed.as_mut().advance().unwrap(), GeneratorState::Complete);
    assert_eq!(fixed.status(), Status::Completed);
}
