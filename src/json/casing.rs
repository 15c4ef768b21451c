//! Purpose: Structural-name camel-casing rule shared by the camel adapters.
//! Exports: `camel_case`.
//! Role: One casing function so serialize and deserialize agree on key spelling.
//! Invariants: Matches serde's `rename_all = "camelCase"` for snake_case input.
//! Invariants: PascalCase input lowers only its leading character.

pub(crate) fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut first = true;
    let mut uppercase_next = false;
    for ch in name.chars() {
        if ch == '_' {
            if !first {
                uppercase_next = true;
            }
            continue;
        }
        if first {
            out.extend(ch.to_lowercase());
            first = false;
        } else if uppercase_next {
            out.extend(ch.to_uppercase());
            uppercase_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::camel_case;

    #[test]
    fn snake_case_becomes_camel() {
        assert_eq!(camel_case("foo_bar"), "fooBar");
        assert_eq!(camel_case("retry_count_max"), "retryCountMax");
    }

    #[test]
    fn pascal_case_lowers_the_head() {
        assert_eq!(camel_case("FooBar"), "fooBar");
    }

    #[test]
    fn already_camel_is_unchanged() {
        assert_eq!(camel_case("fooBar"), "fooBar");
        assert_eq!(camel_case("id"), "id");
    }

    #[test]
    fn leading_underscore_is_dropped() {
        assert_eq!(camel_case("_private_field"), "privateField");
    }
}
