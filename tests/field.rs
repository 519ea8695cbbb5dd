#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        get_set in field is OK
        "42"
        "43"
    }

    tests! {
        fields_are_per_instance in field is OK
        "a"
        "b"
    }

    tests! {
        fields_shadow_methods in field is OK
        "method"
        "field"
    }

    tests! {
        undefined_property in field is ERR(70)
        "Undefined property 'missing'."
        "[line 2]"
    }

    tests! {
        get_on_non_instance in field is ERR(70)
        "Only instances have properties."
        "[line 1]"
    }

    tests! {
        set_on_non_instance in field is ERR(70)
        "Only instances have fields."
        "[line 1]"
    }
}
