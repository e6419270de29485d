#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const QUINCE_ASSERT_LEVEL_DEFINITION: u8 = QUINCE_ASSERT_ADVANCED;

pub const QUINCE_ASSERT_SIMPLE: u8 = 1;
pub const QUINCE_ASSERT_MODERATE: u8 = 2;
pub const QUINCE_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! quince_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::QUINCE_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! quince_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::QUINCE_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! quince_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::QUINCE_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! quince_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::QUINCE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::QUINCE_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

/// Warns once that expensive assertions are enabled; called when an engine is created.
pub(crate) fn warn_if_expensive_asserts() {
    if QUINCE_ASSERT_LEVEL_DEFINITION >= QUINCE_ASSERT_MODERATE {
        log::warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active.",
            QUINCE_ASSERT_LEVEL_DEFINITION
        );
    }
}
