//! Internal types used by `#[generator]`-tagged functions.

use_prelude!();

pub use self::call_boxed::CallBoxed;
mod call_boxed;

mod delegate;

pub(in crate)
mod internals {
    use super::*;

    /// The main "hack": the slot used by the `async fn` to yield items through
    /// it, and to receive whatever the consumer injects back, at each
    /// `.await` / `yield_!` point.
    ///
    /// # DO NOT USE DIRECTLY
    ///
    /// Never use or access this value directly, let the macro sugar do it.
    /// Failure to comply may jeopardize the memory safety of the program,
    /// which a failguard will detect, causing the program to abort.
    /// You have been warned.
    ///
    /// For instance, the following code leads to an abort:
    ///
    /// ```rust,no_run
    /// use ::coyield::{__::__Internals_YieldSlot_DoNotUse__, prelude::*};
    ///
    /// async fn generator (yield_slot: __Internals_YieldSlot_DoNotUse__<'static, u8>, _: ())
    ///   -> GenResult<__Internals_YieldSlot_DoNotUse__<'static, u8>>
    /// {
    ///     Ok(yield_slot)
    /// }
    ///
    /// let dangling_yield_slot = {
    ///     let mut gen = generator.call_boxed(());
    ///     match gen.as_mut().advance() {
    ///         | Ok(GeneratorState::Returned(yield_slot)) => yield_slot,
    ///         | _ => unreachable!(),
    ///     }
    ///     // the generator is dropped and the obtained yield_slot would thus
    ///     // dangle. This is detected by the generator destructor
    ///     // (guaranteed to run thanks to `Pin` guarantees), which then
    ///     // aborts the program to avoid unsoundness.
    /// };
    /// // <-- never reached "thanks" to the abort.
    /// let _ = dangling_yield_slot.suspend(42); // write-dereference a dangling pointer !
    /// ```
    pub
    struct YieldSlot<
        'yield_slot,
        Item : 'yield_slot,
        Resume : 'yield_slot = (),
        Thrown : 'yield_slot = Infallible,
    > {
        pub(in super)
        item_slot: Pin<&'yield_slot ItemSlot<Item, Resume, Thrown>>,
    }
}
use internals::YieldSlot;

impl<Item, Resume, Thrown> Drop for YieldSlot<'_, Item, Resume, Thrown> {
    fn drop (self: &'_ mut Self)
    {
        self.item_slot.drop_flag.set(());
    }
}

/// What the consumer hands to a suspended body when waking it up.
pub(in crate)
enum Injection<Resume, Thrown> {
    /// `resume` / `send`: the pending `yield_!` evaluates to this.
    Send(Option<Resume>),
    /// `throw`: the pending `yield_!` fails with this.
    Throw(Thrown),
    /// `close`: the pending `yield_!` fails with `GeneratorExit`.
    Close,
}

struct ItemSlot<Item, Resume, Thrown> {
    /// Body → consumer.
    value: CellOption<Item>,
    /// Consumer → body.
    injection: CellOption<Injection<Resume, Thrown>>,
    drop_flag: CellOption<()>,
}

impl<'yield_slot, Item, Resume, Thrown> YieldSlot<'yield_slot, Item, Resume, Thrown> {
    #[inline]
    fn new (item_slot: Pin<&'yield_slot ItemSlot<Item, Resume, Thrown>>)
      -> Self
    {
        Self { item_slot }
    }

    #[doc(hidden)]
    /// Fills the slot with a value, and returns an `.await`-able to be used as
    /// suspension point. It resolves to whatever the consumer injects when
    /// resuming the generator.
    pub
    fn suspend (self: &'_ Self, value: Item)
      -> impl Future<Output = GenResult<Option<Resume>, Thrown>> + '_
    {
        let prev: Option<Item> = self.item_slot.value.set(value);
        debug_assert!(prev.is_none(), "slot was empty");
        let item_slot = self.item_slot;
        // "Dummy" `.await`-able:
        //
        //  1. The first time it is polled, the slot has just been filled;
        //     which triggers a `Pending` yield interruption, so that the
        //     outer thing polling it (`GeneratorFn::resume`), gets to extract
        //     the value out of the yield slot.
        //
        //  2. The second time it is polled, the value slot is empty and the
        //     consumer has put an `Injection` in, which becomes the result of
        //     the suspension point.
        poll_fn(move |_| {
            if item_slot.value.is_some() {
                return Poll::Pending;
            }
            match item_slot.injection.take() {
                | Some(Injection::Send(arg)) => Poll::Ready(Ok(arg)),
                | Some(Injection::Throw(error)) => {
                    Poll::Ready(Err(GenError::Raised(error)))
                },
                | Some(Injection::Close) => {
                    Poll::Ready(Err(GenError::GeneratorExit))
                },
                | None => Poll::Pending,
            }
        })
    }
}

/// An _instance_ of a `#[generator]`-tagged function.
///
/// These are created in a two-step fashion:
///
///  1. First, an [`empty()`][`GeneratorFn::empty`] generator is created,
///     which is to be [pinned][`Pin`].
///
///  2. Once it is [pinned][`Pin`], it can be [`.init()`][
///     `GeneratorFn::init`]-ialized with a `#[generator]`-tagged function.
///
/// Neither step runs any of the body: the generator starts in
/// [`Status::Created`].
///
/// As with any [`Generator`], for a [`GeneratorFn`] to be usable, it must have
/// been previously [`Pin`]ned:
///
///   - either in the _heap_, through [`Box::pin`];
///
///     ```rust
///     use ::coyield::{prelude::*, GeneratorFn};
///
///     #[generator(u32)]
///     fn countdown (mut remaining: u32)
///       -> GenResult<()>
///     {
///         while let Some(next) = remaining.checked_sub(1) {
///             yield_!(remaining);
///             remaining = next;
///         }
///         Ok(())
///     }
///
///     let generator = GeneratorFn::empty();
///     let mut generator = Box::pin(generator);
///     generator.as_mut().init(countdown, (3,));
///
///     let mut next = || generator.as_mut().advance().unwrap();
///     assert_eq!(next(), GeneratorState::Yielded(3));
///     assert_eq!(next(), GeneratorState::Yielded(2));
///     assert_eq!(next(), GeneratorState::Yielded(1));
///     assert_eq!(next(), GeneratorState::Returned(()));
///     ```
///
///   - or in the _stack_, through [`stack_pinned!`][`crate::stack_pinned`].
///
/// # `mk_gen!`
///
/// [`mk_gen!`][`crate::mk_gen`] is a macro that reduces the boilerplate of
/// the above patterns, by performing the two step-initialization within a
/// single macro call.
///
/// # Dropping
///
/// Dropping a suspended generator first [closes][`Generator::close`] it, so
/// that the body gets to run its cleanup code.
pub
struct GeneratorFn<Item, F : Future, Resume = (), Thrown = Infallible> {
    item_slot: ItemSlot<Item, Resume, Thrown>,

    future: Option<F>,

    status: Status,

    /// Once a `GeneratorFn` has been pinned, its Drop (glue) must be run
    /// before being deallocated!
    _pin_sensitive: PhantomPinned,
}

struct GeneratorPinnedFields<'pin, Item : 'pin, F : 'pin, Resume : 'pin, Thrown : 'pin> {
    item_slot: Pin<&'pin ItemSlot<Item, Resume, Thrown>>,
    future: Pin<&'pin mut Option<F>>,
    status: &'pin mut Status,
}

/// The outcome of polling the body once.
enum Driven<Item, Output> {
    Yielded(Item),
    Finished(Output),
    Stalled,
}

impl<Item, F : Future, Resume, Thrown> Drop
    for GeneratorFn<Item, F, Resume, Thrown>
{
    fn drop (self: &'_ mut Self)
    {
        let initialized = self.is_initialized();
        let this = unsafe {
            // # Safety
            //
            // This is the "pinned drop" pattern: `self` is never used again
            // after this point, and was pinned since it was initialized.
            Pin::new_unchecked(self)
        };
        ::unwind_safe::with_state(this)
            .try_eval(|this| if initialized {
                if this.status == Status::Suspended {
                    this.as_mut().close_on_drop();
                }
                // drop the future *in place*
                this.as_mut().project().future.set(None);
            })
            .finally(|this| if initialized && this.item_slot.drop_flag.is_none() {
                macros::abort_with_msg!("\
                    `::coyield` fatal runtime error: \
                    a `YieldSlot` was about to dangle!\
                    \n\
                    \n\
                    This is only possible if the internals of `::coyield` \
                    were directly (ab)used, \
                    by making a `YieldSlot` escape the `#[generator] fn`.\
                    \n\
                    Since this could lead to memory unsafety, \
                    the program will now abort.\
                ");
            })
    }
}

impl<Item, F : Future, Resume, Thrown> GeneratorFn<Item, F, Resume, Thrown> {
    fn is_initialized (self: &'_ Self)
      -> bool
    {
        self.future.is_some() || self.status != Status::Created
    }

    fn project (self: Pin<&'_ mut Self>)
      -> GeneratorPinnedFields<'_, Item, F, Resume, Thrown>
    {
        assert!(
            self.is_initialized(),
            "You must init a GeneratorFn before using it!",
        );
        unsafe {
            // # Safety
            //
            // This is the same as ::pin_project's .project() method:
            //
            //   - `item_slot` and `future` are considered transitively pinned,
            //     `status` is not;
            //
            //   - `Drop` does not move without calling the destructor,
            //
            //   - no packing
            let this = self.get_unchecked_mut();
            GeneratorPinnedFields {
                item_slot: Pin::new_unchecked(&this.item_slot),
                future: Pin::new_unchecked(&mut this.future),
                status: &mut this.status,
            }
        }
    }

    /// Reserves memory for an empty generator.
    pub
    fn empty ()
      -> Self
    {
        Self {
            item_slot: ItemSlot {
                value: CellOption::None,
                injection: CellOption::None,
                drop_flag: CellOption::None,
            },
            future: None,
            status: Status::Created,
            _pin_sensitive: PhantomPinned,
        }
    }

    /// Fill the memory reserved by [`GeneratorFn::empty`]`()` with an instance
    /// of the generator function / factory.
    ///
    /// This does not run any of the body.
    pub
    fn init<'pin, 'yield_slot, Args> (
        self: Pin<&'pin mut Self>,
        factory: impl FnOnce(YieldSlot<'yield_slot, Item, Resume, Thrown>, Args) -> F,
        args: Args,
    )
    where
        Item : 'yield_slot,
        Resume : 'yield_slot,
        Thrown : 'yield_slot,
    {
        assert!(
            !self.is_initialized(),
            "GeneratorFn cannot be initialized multiple times!",
        );
        unsafe {
            // # Safety
            //
            //   - This is a pinning projection except for the `future` field,
            //     to which it gets raw "unlimited" access. This is safe because
            //     the field cannot have been pinned yet (given the API).
            //
            //   - The pinning guarantee ensures the soundness of the lifetime
            //     extension: `GeneratorFn` destructor is guaranteed to run,
            //     which performs a runtime check to ensure that the
            //     `yield_slot` has been dropped. If it hasn't, the program
            //     aborts to avoid any potential unsoundness.
            let this = self.get_unchecked_mut();
            let yield_slot =
                YieldSlot::new(Pin::new_unchecked(
                    ::core::mem::transmute::<
                        &'pin ItemSlot<Item, Resume, Thrown>,
                        &'yield_slot ItemSlot<Item, Resume, Thrown>,
                    >(
                        &this.item_slot
                    )
                ))
            ;
            this.future = Some(factory(yield_slot, args));
        }
        ::tracing::trace!("generator created");
    }

    /// Moves to a terminal `status`, dropping the body (and thus all of its
    /// locals) in place.
    fn finish (self: Pin<&'_ mut Self>, status: Status)
    {
        let GeneratorPinnedFields { mut future, status: current, .. } = self.project();
        *current = status;
        future.set(None);
        ::tracing::trace!(?status, "generator finished");
    }

    /// Polls the body once, after having loaded `injection` (if any) into its
    /// pending suspension point.
    fn drive (
        self: Pin<&'_ mut Self>,
        injection: Option<Injection<Resume, Thrown>>,
    ) -> Driven<Item, F::Output>
    {
        let GeneratorPinnedFields { item_slot, mut future, status } = self.project();
        if let Some(injection) = injection {
            item_slot.injection.set(injection);
        }
        // Until proven otherwise: a panicking body leaves us errored.
        *status = Status::Errored;
        let body = match future.as_mut().as_pin_mut() {
            | Some(body) => body,
            | None => unreachable!("a live generator always holds its body"),
        };
        create_context!(cx);
        let polled = body.poll(&mut cx);
        drop(item_slot.injection.take());
        match polled {
            | Poll::Pending => match item_slot.value.take() {
                | Some(value) => {
                    *status = Status::Suspended;
                    Driven::Yielded(value)
                },
                | None => {
                    future.set(None);
                    ::tracing::trace!("generator stalled");
                    Driven::Stalled
                },
            },
            | Poll::Ready(output) => {
                future.set(None);
                Driven::Finished(output)
            },
        }
    }

    /// Best-effort `close()`, for when the output type is not known.
    fn close_on_drop (self: Pin<&'_ mut Self>)
    {
        match self.drive(Some(Injection::Close)) {
            | Driven::Yielded(_) => ::tracing::warn!(
                "generator ignored GeneratorExit while being dropped",
            ),
            | Driven::Stalled => ::tracing::warn!(
                "generator stalled while being dropped",
            ),
            | Driven::Finished(_) => {},
        }
    }
}

impl<Item, F, R, Resume, Thrown> GeneratorFn<Item, F, Resume, Thrown>
where
    F : Future<Output = GenResult<R, Thrown>>,
{
    fn step (
        mut self: Pin<&'_ mut Self>,
        injection: Option<Injection<Resume, Thrown>>,
    ) -> Step<Item, R, Thrown>
    {
        match self.as_mut().drive(injection) {
            | Driven::Yielded(value) => Ok(GeneratorState::Yielded(value)),
            | Driven::Finished(Ok(returned)) => {
                self.finish(Status::Completed);
                Ok(GeneratorState::Returned(returned))
            },
            | Driven::Finished(Err(error)) => {
                self.finish(Status::Errored);
                Err(error)
            },
            | Driven::Stalled => Err(GenError::Stalled),
        }
    }
}

impl<Item, F, R, Resume, Thrown> Generator<Resume>
    for GeneratorFn<Item, F, Resume, Thrown>
where
    F : Future<Output = GenResult<R, Thrown>>,
{
    type Yield = Item;

    type Return = R;

    type Thrown = Thrown;

    fn resume (
        self: Pin<&'_ mut Self>,
        resume_arg: Option<Resume>,
    ) -> Step<Item, R, Thrown>
    {
        let status = self.status;
        let injection = match status {
            | Status::Created => None,
            | Status::Suspended => Some(Injection::Send(resume_arg)),
            | Status::Completed | Status::Errored => {
                return Err(GenError::Exhausted);
            },
        };
        self.step(injection)
    }

    fn throw (
        self: Pin<&'_ mut Self>,
        error: Thrown,
    ) -> Step<Item, R, Thrown>
    {
        let status = self.status;
        match status {
            | Status::Suspended => self.step(Some(Injection::Throw(error))),
            | Status::Created => {
                self.finish(Status::Errored);
                Err(GenError::Raised(error))
            },
            | Status::Completed | Status::Errored => {
                Err(GenError::Raised(error))
            },
        }
    }

    fn close (
        mut self: Pin<&'_ mut Self>,
    ) -> Result<(), GenError<Thrown>>
    {
        let status = self.status;
        match status {
            | Status::Suspended => {},
            | Status::Created => {
                self.finish(Status::Completed);
                return Ok(());
            },
            | Status::Completed | Status::Errored => return Ok(()),
        }
        match self.as_mut().drive(Some(Injection::Close)) {
            | Driven::Yielded(_) => {
                self.finish(Status::Errored);
                Err(GenError::IgnoredExit)
            },
            | Driven::Finished(Ok(_))
            | Driven::Finished(Err(GenError::GeneratorExit))
            => {
                self.finish(Status::Completed);
                Ok(())
            },
            | Driven::Finished(Err(error)) => {
                self.finish(Status::Errored);
                Err(error)
            },
            | Driven::Stalled => Err(GenError::Stalled),
        }
    }

    #[inline]
    fn status (self: &'_ Self)
      -> Status
    {
        self.status
    }
}
