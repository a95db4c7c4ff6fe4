/// Return Err of the expression: `return Err($expression);`.
#[macro_export]
macro_rules! fail {
    ( $y:expr ) => {{
        return Err($y.into());
    }};
}

/// Evaluate `$x:expr` and if not true return `Err($y:expr)`.
#[macro_export]
macro_rules! ensure {
    ( $x:expr, $y:expr $(,)? ) => {{
        if !$x {
            $crate::fail!($y);
        }
    }};
}

/// Assert that `$x:expr` failed with the error `$y:expr`, ignoring location wrappers.
#[macro_export]
macro_rules! assert_err {
    ( $x:expr, $y:expr $(,)? ) => {{
        match $x {
            Ok(_) => panic!("expected `{}`, got a success", $y),
            Err(e) => assert_eq!(e.unwrapped(), &$y),
        }
    }};
}
