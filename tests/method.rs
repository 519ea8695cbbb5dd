#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests! {
        this_in_method in method is OK
        "The chocolate cake is delicious!"
    }

    tests! {
        bound_method_keeps_this in method is OK
        "Jane"
    }

    tests! {
        this_survives_nested_functions in method is OK
        "me"
    }

    tests! {
        too_many_parameters in method is ERR(65)
        "[line 1] Error at 'p256': Can't have more than 255 parameters."
        "[line 1] Error at 'p257': Can't have more than 255 parameters."
        "[line 1] Error at 'p258': Can't have more than 255 parameters."
        "[line 1] Error at 'p259': Can't have more than 255 parameters."
        "[line 1] Error at 'p260': Can't have more than 255 parameters."
    }

    tests! {
        too_many_arguments in method is ERR(65)
        "[line 2] Error at '256': Can't have more than 255 arguments."
        "[line 2] Error at '257': Can't have more than 255 arguments."
        "[line 2] Error at '258': Can't have more than 255 arguments."
        "[line 2] Error at '259': Can't have more than 255 arguments."
        "[line 2] Error at '260': Can't have more than 255 arguments."
    }
}
