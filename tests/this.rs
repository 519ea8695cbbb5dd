#[macro_use]
mod common;

#[cfg(test)]
mod this {
    tests! {
        refers_to_receiver in this is OK
        "true"
    }

    tests! {
        outside_class in this is ERR(65)
        "[line 1] Error at 'this': Can't use 'this' outside of a class."
    }

    tests! {
        in_top_level_function in this is ERR(65)
        "[line 2] Error at 'this': Can't use 'this' outside of a class."
    }
}
