#[macro_use]
mod common;

#[cfg(test)]
mod r#if {
    tests! {
        then_and_else in if is OK
        "then"
        "else"
    }

    tests! {
        truthiness_decides in if is OK
        "zero is truthy"
        "empty is truthy"
        "nil is falsy"
    }

    tests! {
        dangling_else in if is OK
        "bound to nearest"
    }
}
