//! Memo Key Module
//!
//! Type-tagged cache keys for memoized argument lists.
//!
//! Each argument is converted to an [`ArgValue`] that records its type along
//! with its value, so `1u8`, `1i64`, `"1"` and `'1'` never share a key even
//! though they print the same.

use serde::Serialize;

// == Arg Value ==
/// One argument, tagged with its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    Unit,
    Bool(bool),
    Char(char),
    Signed { bits: u8, value: i128 },
    Unsigned { bits: u8, value: u128 },
    /// Pointer-width integers, tagged apart from the fixed-width ones
    Isize(i64),
    Usize(u64),
    /// IEEE bit pattern; `-0.0` folds into `0.0` and every NaN into one key
    Float { bits: u8, raw: u64 },
    Str(String),
    Option(Option<Box<ArgValue>>),
    Seq(Vec<ArgValue>),
    Tuple(Vec<ArgValue>),
}

// == Memo Key ==
/// Key for one call: the ordered list of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MemoKey(pub Vec<ArgValue>);

impl MemoKey {
    pub fn args(&self) -> &[ArgValue] {
        &self.0
    }
}

// == Memo Arg ==
/// Converts a single argument into its tagged form.
pub trait MemoArg {
    fn to_arg(&self) -> ArgValue;
}

// == Memo Args ==
/// Converts a whole argument list into a [`MemoKey`].
///
/// Implemented for tuples (one element per argument) and for single
/// arguments, so `f.call(7u32)` and `f.call((7u32,))` share a key. Implement
/// it for your own types to supply a custom key derivation.
pub trait MemoArgs {
    fn memo_key(&self) -> MemoKey;
}

macro_rules! signed_args {
    ($($t:ty),*) => {$(
        impl MemoArg for $t {
            fn to_arg(&self) -> ArgValue {
                ArgValue::Signed { bits: <$t>::BITS as u8, value: *self as i128 }
            }
        }
    )*};
}

macro_rules! unsigned_args {
    ($($t:ty),*) => {$(
        impl MemoArg for $t {
            fn to_arg(&self) -> ArgValue {
                ArgValue::Unsigned { bits: <$t>::BITS as u8, value: *self as u128 }
            }
        }
    )*};
}

signed_args!(i8, i16, i32, i64, i128);
unsigned_args!(u8, u16, u32, u64, u128);

impl MemoArg for isize {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Isize(*self as i64)
    }
}

impl MemoArg for usize {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Usize(*self as u64)
    }
}

impl MemoArg for f32 {
    fn to_arg(&self) -> ArgValue {
        let canonical = if self.is_nan() {
            f32::NAN
        } else if *self == 0.0 {
            0.0
        } else {
            *self
        };
        ArgValue::Float {
            bits: 32,
            raw: u64::from(canonical.to_bits()),
        }
    }
}

impl MemoArg for f64 {
    fn to_arg(&self) -> ArgValue {
        let canonical = if self.is_nan() {
            f64::NAN
        } else if *self == 0.0 {
            0.0
        } else {
            *self
        };
        ArgValue::Float {
            bits: 64,
            raw: canonical.to_bits(),
        }
    }
}

impl MemoArg for () {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Unit
    }
}

impl MemoArg for bool {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Bool(*self)
    }
}

impl MemoArg for char {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Char(*self)
    }
}

impl MemoArg for str {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Str(self.to_owned())
    }
}

impl MemoArg for String {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Str(self.clone())
    }
}

impl<T: MemoArg> MemoArg for Option<T> {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Option(self.as_ref().map(|inner| Box::new(inner.to_arg())))
    }
}

impl<T: MemoArg> MemoArg for [T] {
    fn to_arg(&self) -> ArgValue {
        ArgValue::Seq(self.iter().map(MemoArg::to_arg).collect())
    }
}

impl<T: MemoArg, const N: usize> MemoArg for [T; N] {
    fn to_arg(&self) -> ArgValue {
        self.as_slice().to_arg()
    }
}

impl<T: MemoArg> MemoArg for Vec<T> {
    fn to_arg(&self) -> ArgValue {
        self.as_slice().to_arg()
    }
}

impl<T: MemoArg + ?Sized> MemoArg for &T {
    fn to_arg(&self) -> ArgValue {
        (**self).to_arg()
    }
}

impl<T: MemoArg + ?Sized> MemoArg for Box<T> {
    fn to_arg(&self) -> ArgValue {
        (**self).to_arg()
    }
}

macro_rules! tuple_args {
    ($(($($name:ident),+)),+) => {$(
        #[allow(non_snake_case)]
        impl<$($name: MemoArg),+> MemoArg for ($($name,)+) {
            fn to_arg(&self) -> ArgValue {
                let ($($name,)+) = self;
                ArgValue::Tuple(vec![$($name.to_arg()),+])
            }
        }

        #[allow(non_snake_case)]
        impl<$($name: MemoArg),+> MemoArgs for ($($name,)+) {
            fn memo_key(&self) -> MemoKey {
                let ($($name,)+) = self;
                MemoKey(vec![$($name.to_arg()),+])
            }
        }
    )+};
}

tuple_args!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F)
);

impl MemoArgs for () {
    fn memo_key(&self) -> MemoKey {
        MemoKey(Vec::new())
    }
}

macro_rules! single_args {
    ($($t:ty),*) => {$(
        impl MemoArgs for $t {
            fn memo_key(&self) -> MemoKey {
                MemoKey(vec![self.to_arg()])
            }
        }
    )*};
}

single_args!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String
);

impl<T: MemoArg> MemoArgs for Option<T> {
    fn memo_key(&self) -> MemoKey {
        MemoKey(vec![self.to_arg()])
    }
}

impl<T: MemoArg> MemoArgs for [T] {
    fn memo_key(&self) -> MemoKey {
        MemoKey(vec![self.to_arg()])
    }
}

impl<T: MemoArg> MemoArgs for Vec<T> {
    fn memo_key(&self) -> MemoKey {
        MemoKey(vec![self.to_arg()])
    }
}

impl<T: MemoArgs + ?Sized> MemoArgs for &T {
    fn memo_key(&self) -> MemoKey {
        (**self).memo_key()
    }
}
