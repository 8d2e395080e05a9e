use std::{fmt, ops};

const READABLE: u8 = 0b001;
const WRITABLE: u8 = 0b010;
const PRIORITY: u8 = 0b100;

/// The set of readiness kinds to watch a source for.
///
/// `Interest` is supplied on registration and tells the selector
/// which readiness transitions to deliver. Values combine with the
/// `|` operator and subtract with `-`; the selector never delivers a
/// readiness kind the caller did not ask for, except for error and
/// hang-up conditions which are always delivered.
///
/// Readable interest also requests notification when the peer closes
/// its write half, surfaced through [`Event::is_read_closed`].
///
/// # Examples
///
/// ```
/// use edge_net::Interest;
///
/// let interests = Interest::READABLE | Interest::WRITABLE;
///
/// assert!(interests.is_readable());
/// assert!(interests.is_writable());
/// assert!(!interests.is_priority());
///
/// let read_only = interests - Interest::WRITABLE;
///
/// assert!(read_only.is_readable());
/// assert!(!read_only.is_writable());
/// ```
///
/// [`Event::is_read_closed`]: struct.Event.html#method.is_read_closed
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub struct Interest(u8);

impl Interest {
    /// Interest in readable readiness, including peer write-half
    /// close.
    pub const READABLE: Interest = Interest(READABLE);

    /// Interest in writable readiness.
    pub const WRITABLE: Interest = Interest(WRITABLE);

    /// Interest in priority (out-of-band) readiness.
    pub const PRIORITY: Interest = Interest(PRIORITY);

    /// Returns the empty interest set.
    #[inline]
    pub const fn empty() -> Interest {
        Interest(0)
    }

    /// Returns the union of `self` and `other`.
    ///
    /// Equivalent to `self | other`.
    #[inline]
    pub const fn add(self, other: Interest) -> Interest {
        Interest(self.0 | other.0)
    }

    /// Returns `self` with all bits of `other` removed.
    ///
    /// Equivalent to `self - other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edge_net::Interest;
    ///
    /// let interests = Interest::READABLE | Interest::WRITABLE;
    ///
    /// assert_eq!(interests.remove(Interest::WRITABLE), Interest::READABLE);
    /// ```
    #[inline]
    pub const fn remove(self, other: Interest) -> Interest {
        Interest(self.0 & !other.0)
    }

    /// Returns true if no readiness kind is selected.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the set includes readable interest.
    #[inline]
    pub const fn is_readable(self) -> bool {
        self.0 & READABLE != 0
    }

    /// Returns true if the set includes writable interest.
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.0 & WRITABLE != 0
    }

    /// Returns true if the set includes priority interest.
    #[inline]
    pub const fn is_priority(self) -> bool {
        self.0 & PRIORITY != 0
    }
}

impl Default for Interest {
    #[inline]
    fn default() -> Interest {
        Interest::empty()
    }
}

impl ops::BitOr for Interest {
    type Output = Interest;

    #[inline]
    fn bitor(self, other: Interest) -> Interest {
        self.add(other)
    }
}

impl ops::BitOrAssign for Interest {
    #[inline]
    fn bitor_assign(&mut self, other: Interest) {
        self.0 |= other.0;
    }
}

impl ops::Sub for Interest {
    type Output = Interest;

    #[inline]
    fn sub(self, other: Interest) -> Interest {
        self.remove(other)
    }
}

impl ops::SubAssign for Interest {
    #[inline]
    fn sub_assign(&mut self, other: Interest) {
        self.0 &= !other.0;
    }
}

impl fmt::Debug for Interest {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut one = false;
        let flags = [
            (Interest::READABLE, "READABLE"),
            (Interest::WRITABLE, "WRITABLE"),
            (Interest::PRIORITY, "PRIORITY"),
        ];

        for &(flag, msg) in &flags {
            if self.0 & flag.0 != 0 {
                if one {
                    write!(fmt, " | ")?
                }
                write!(fmt, "{}", msg)?;

                one = true
            }
        }

        if !one {
            fmt.write_str("(empty)")?;
        }

        Ok(())
    }
}

#[test]
fn test_debug_interest() {
    assert_eq!("(empty)", format!("{:?}", Interest::empty()));
    assert_eq!("READABLE", format!("{:?}", Interest::READABLE));
    assert_eq!("WRITABLE", format!("{:?}", Interest::WRITABLE));
    assert_eq!(
        "READABLE | WRITABLE",
        format!("{:?}", Interest::READABLE | Interest::WRITABLE)
    );
}

#[test]
fn test_union_is_idempotent() {
    let all = Interest::READABLE | Interest::WRITABLE | Interest::PRIORITY;

    assert_eq!(Interest::READABLE | Interest::READABLE, Interest::READABLE);
    assert_eq!(all | all, all);
}

#[test]
fn test_difference_drops_exactly_shared_bits() {
    let rw = Interest::READABLE | Interest::WRITABLE;
    let wp = Interest::WRITABLE | Interest::PRIORITY;

    assert_eq!((rw | wp) - wp, Interest::READABLE);
    assert_eq!(rw - Interest::PRIORITY, rw);
    assert!((Interest::READABLE - Interest::READABLE).is_empty());
}

#[test]
fn test_queries() {
    assert!(Interest::READABLE.is_readable());
    assert!(!Interest::READABLE.is_writable());
    assert!(!Interest::READABLE.is_priority());
    assert!(Interest::WRITABLE.is_writable());
    assert!(Interest::PRIORITY.is_priority());
    assert!(Interest::empty().is_empty());
    assert!(!(Interest::READABLE | Interest::PRIORITY).is_empty());
}
