//! Compile-time forwarding of binary operators to an inner field.

/// Implement `core::ops` binary operators on a wrapper type by forwarding
/// to one of its fields, optionally passing the result through a
/// transform.
///
/// ```
/// use uno_delegate::delegate_binary_ops;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Meters(f64);
///
/// delegate_binary_ops! {
///     Meters => 0 {
///         Add::add(f64) -> Meters => Meters;
///         Mul::mul(f64) -> f64;
///     }
/// }
///
/// assert_eq!(Meters(1.5) + 2.0, Meters(3.5));
/// assert_eq!(Meters(2.0) * 3.0, 6.0);
/// ```
#[macro_export]
macro_rules! delegate_binary_ops {
    (
        $target:ty => $field:tt {
            $( $Trait:ident :: $method:ident ( $Rhs:ty ) -> $Out:ty $( => $transform:expr )? ; )+
        }
    ) => {
        $(
            impl ::core::ops::$Trait<$Rhs> for $target {
                type Output = $Out;

                fn $method(self, rhs: $Rhs) -> $Out {
                    let result = ::core::ops::$Trait::$method(self.$field, rhs);
                    $crate::__apply_transform!(result $(, $transform)?)
                }
            }
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __apply_transform {
    ($result:expr) => {
        $result
    };
    ($result:expr, $transform:expr) => {
        ($transform)($result)
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Wrapped {
        inner: i64,
    }

    #[derive(Debug, PartialEq)]
    enum Sign {
        Positive,
        Negative,
    }

    fn sign(n: i64) -> Sign {
        if n >= 0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    delegate_binary_ops! {
        Wrapped => inner {
            Add::add(i64) -> Sign => sign;
            Sub::sub(i64) -> Sign => sign;
            Mul::mul(i64) -> i64;
            Rem::rem(i64) -> Wrapped => |inner| Wrapped { inner };
        }
    }

    #[test]
    fn test_transformed_results() {
        let w = Wrapped { inner: 1 };
        assert_eq!(w + 1, Sign::Positive);
        assert_eq!(w + -10, Sign::Negative);
        assert_eq!(w - 4, Sign::Negative);
        assert_eq!(w - 0, Sign::Positive);
    }

    #[test]
    fn test_raw_and_rewrapped_results() {
        let w = Wrapped { inner: 7 };
        assert_eq!(w * 3, 21);
        assert_eq!(w % 4, Wrapped { inner: 3 });
    }
}
