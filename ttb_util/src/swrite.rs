/// Variant of write! that only accepts a `String` destination and can not fail.
#[macro_export]
macro_rules! swrite {
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        let dst: &mut String = &mut $dst;
        write!(dst, $($arg)*).expect("writing to a string can not fail");
    }};
}

/// Variant of writeln! that only accepts a `String` destination and can not fail.
#[macro_export]
macro_rules! swriteln {
    ($dst:expr $(,)?) => {{
        use std::fmt::Write;
        let dst: &mut String = &mut $dst;
        writeln!(dst).expect("writing to a string can not fail");
    }};
    ($dst:expr, $($arg:tt)*) => {{
        use std::fmt::Write;
        let dst: &mut String = &mut $dst;
        writeln!(dst, $($arg)*).expect("writing to a string can not fail");
    }};
}
