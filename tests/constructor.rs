#[macro_use]
mod common;

#[cfg(test)]
mod constructor {
    tests! {
        init_runs_on_call in constructor is OK
        "3"
        "4"
    }

    tests! {
        direct_init_call_returns_instance in constructor is OK
        "true"
    }

    tests! {
        early_return in constructor is OK
        "false"
        "true"
    }

    tests! {
        arity_from_init in constructor is ERR(70)
        "Expected 2 arguments but got 1."
        "[line 4]"
    }

    tests! {
        return_value_from_init in constructor is ERR(65)
        "[line 3] Error at 'return': Can't return a value from an initializer."
    }
}
