use ::core::{
    cell::Cell,
    mem::MaybeUninit,
};

/// An `Option<T>` behind shared references, without requiring `T : Copy`
/// nor `T : Default` to move values in and out of it.
pub
struct CellOption<T> /* = */ {
    is_some: Cell<bool>,
    value: Cell<MaybeUninit<T>>,
}

impl<T> CellOption<T> {
    #[allow(bad_style)]
    pub
    const None: Self = Self {
        is_some: Cell::new(false),
        value: Cell::new(MaybeUninit::uninit()),
    };

    pub
    fn take (self: &'_ Self)
      -> Option<T>
    {
        if self.is_some() {
            self.is_some.set(false);
            Some(unsafe {
                // Safety: `is_some` was `true`, so `value` was initialized,
                // and we have just marked it as moved out.
                self.value
                    .replace(MaybeUninit::uninit())
                    .assume_init()
            })
        } else {
            None
        }
    }

    pub
    fn set (self: &'_ Self, value: T)
      -> Option<T>
    {
        let prev = self.value.replace(MaybeUninit::new(value));
        if self.is_some() {
            Some(unsafe {
                // Safety: `is_some` was already `true`.
                prev.assume_init()
            })
        } else {
            self.is_some.set(true);
            None
        }
    }

    #[inline]
    pub
    fn is_some (self: &'_ Self)
      -> bool
    {
        self.is_some.get()
    }

    #[inline]
    pub
    fn is_none (self: &'_ Self)
      -> bool
    {
        !self.is_some()
    }
}

impl<T> Drop for CellOption<T> {
    fn drop (self: &'_ mut Self)
    {
        drop(self.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::std::rc::Rc;

    #[test]
    fn set_then_take ()
    {
        let slot = CellOption::None;
        assert!(slot.is_none());
        assert_eq!(slot.set(1_u8), None);
        assert_eq!(slot.set(2), Some(1));
        assert!(slot.is_some());
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn drops_leftover_value ()
    {
        let value = Rc::new(());
        {
            let slot = CellOption::None;
            slot.set(Rc::clone(&value));
            assert_eq!(Rc::strong_count(&value), 2);
        }
        assert_eq!(Rc::strong_count(&value), 1);
    }
}
