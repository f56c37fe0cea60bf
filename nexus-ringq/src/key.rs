//! Key trait for node handles.
//!
//! Nodes are addressed by integer keys into storage. One value of every key
//! type is reserved: [`Key::NONE`] never names a payload node. Inside a
//! queue it names the sentinel, inside an open chain it terminates the ends.

/// A copyable node handle with a reserved `NONE` value.
///
/// # Example
///
/// ```
/// use nexus_ringq::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::NONE, u32::MAX);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug + 'static {
    /// Reserved value. Addresses the sentinel of a ring.
    const NONE: Self;

    /// Creates a key from a slot index.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot index.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the reserved value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this addresses a payload node.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);
