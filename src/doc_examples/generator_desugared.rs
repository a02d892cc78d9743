fn main ()
{
    use ::coyield::prelude::*;

    async fn countdown<Ret> (
        __yield_slot__: ::coyield::__::__Internals_YieldSlot_DoNotUse__<'_, u8>,
        (count, value): (u8, Ret),
    ) -> GenResult<Ret>
    {
        macro_rules! yield_ {( $value:expr $(,)? ) => (
            __yield_slot__.suspend($value).await?
        )}
        {
            let mut current = count;
            while let Some(next) = current.checked_sub(1) {
                yield_!(current);
                current = next;
            }
            Ok(value)
        }
    }

    let generator = ::coyield::GeneratorFn::empty();
    ::coyield::stack_pinned!(mut generator);
    generator
        .as_mut()
        .init(countdown, (3, "Boom!"))
    ;
    let mut next = || generator.as_mut().advance().unwrap();
    assert_eq!(next(), GeneratorState::Yielded(3));
    assert_eq!(next(), GeneratorState::Yielded(2));
    assert_eq!(next(), GeneratorState::Yielded(1));
    assert_eq!(next(), GeneratorState::Returned("Boom!"));
    assert_eq!(generator.status(), Status::Completed);
}
