const N: u64 = 1_u64 << 16;
const OUTPUT: u64 = 2147516416;

#[test]
fn auto_heap_state ()
{
    assert_eq!(
        auto_heap_state::triangular(N),
        OUTPUT,
    );
}

/// Small enough inputs for plain recursion to be safe: both strategies must
/// agree.
#[test]
fn auto_heap_state_matches_plain_recursion ()
{
    for n in 0 ..= 100 {
        assert_eq!(
            auto_heap_state::triangular(n),
            naive_stack_state::triangular(n),
            "triangular({})", n,
        );
    }
}

mod naive_stack_state {
    pub
    fn triangular (n: u64)
      -> u64
    {
        if n == 0 {
            0
        } else {
            n + triangular(n - 1)
        }
    }
}

mod auto_heap_state {
    use ::coyield::prelude::*;

    /// A recursive computation can be seen as a "suspensible coroutine",
    /// whereby, when needing to "compute-recurse" into (smaller) parameters,
    /// that current computation just suspends and yields the new parameter
    /// for which it requests a computation.
    ///
    /// The driver thus starts with the initial argument, and resumes the
    /// computation until reaching a suspension point, which gives the driver
    /// a new computation to perform, and a new "customer" waiting for its
    /// result: the suspended computation. These stack onto each other as we
    /// recurse, and when the innermost computation _returns_ rather than
    /// yield-enqueuing a new one, its result is sent to the top-most
    /// suspended computation, _resuming_ it.
    fn drive_recursion<Arg, Gen, R> (
        arg: Arg,
        mut start_computing: impl FnMut(Arg) -> Gen,
    ) -> GenResult<R, Gen::Thrown>
    where
        Gen : Generator<R, Yield = Arg, Return = R> + Unpin,
    {
        // The "recursive state stack", heap-allocated: each `Pin<Box<…>>`
        // holds the locals of a suspended computation.
        let mut suspended_computations = Vec::<Gen>::new();

        let mut last_suspended_computation = start_computing(arg);
        let mut computation_result = None;

        loop {
            match last_suspended_computation.resume_unpin(computation_result.take())? {
                // The current computation completed.
                | GeneratorState::Returned(computation_result_) => {
                    match suspended_computations.pop() {
                        // It was the outer-most computation: we are done.
                        | None => return Ok(computation_result_),
                        | Some(suspended_computation) => {
                            last_suspended_computation = suspended_computation;
                            computation_result = Some(computation_result_);
                        },
                    }
                },
                // We need to "compute-recurse" with this new `arg`.
                | GeneratorState::Yielded(arg) => {
                    suspended_computations.push(last_suspended_computation);
                    last_suspended_computation = start_computing(arg);
                },
            }
        }
    }

    pub
    fn triangular (n: u64)
      -> u64
    {
        #[generator(yield(u64), resume(u64))]
        fn triangular (n: u64)
          -> GenResult<u64>
        {
            macro_rules! recurse {( $arg:expr ) => (
                yield_!($arg).unwrap_or_default()
            )}
            if n == 0 {
                Ok(0)
            } else {
                Ok(n + recurse!(n - 1))
            }
        }

        drive_recursion(n, |n| triangular.call_boxed((n, ))).unwrap()
    }
}
