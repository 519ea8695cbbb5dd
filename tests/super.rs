#[macro_use]
mod common;

#[cfg(test)]
mod _super {
    tests! {
        dispatch in super is OK
        "Rex makes a noise"
        "Rex barks"
    }

    tests! {
        super_in_inherited_method in super is OK
        "A method"
    }

    tests! {
        super_in_closure in super is OK
        "A"
    }

    tests! {
        super_missing_method in super is ERR(70)
        "Undefined property 'missing'."
        "[line 4]"
    }

    tests! {
        no_superclass in super is ERR(65)
        "[line 3] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        outside_class in super is ERR(65)
        "[line 1] Error at 'super': Can't use 'super' outside of a class."
    }
}
