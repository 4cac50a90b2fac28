//! Name derivation helpers shared by reflection and synthesis.
//!
//! Collection titles are derived from host type names (`UserAccount` →
//! `user_accounts`) and synthesized type names are derived back from titles
//! (`user_accounts` → `UserAccount`). Inflection is rule-based and
//! approximate; irregular nouns and some `-e` stems are not special-cased.

/// Converts a type's simple name to lower-case, underscore-separated words.
///
/// Every uppercase letter except the first character of the string starts a
/// new segment. Any other run of non-alphanumeric characters collapses to a
/// single underscore.
///
/// # Examples
///
/// ```
/// use collection_schema_core::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("UserAccount"), "user_account");
/// assert_eq!(to_snake_case("My--Type"), "my_type");
/// assert_eq!(to_snake_case("HTTPServer"), "h_t_t_p_server");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut pending_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_alphanumeric() {
            pending_separator = true;
            continue;
        }
        if (pending_separator || (ch.is_uppercase() && i > 0)) && !out.is_empty() {
            out.push('_');
        }
        pending_separator = false;
        out.extend(ch.to_lowercase());
    }

    out
}

/// Converts an underscore- or dash-separated name to PascalCase.
///
/// # Examples
///
/// ```
/// use collection_schema_core::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user_account"), "UserAccount");
/// assert_eq!(to_pascal_case("order-line"), "OrderLine");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Pluralizes the final word of a name.
///
/// # Examples
///
/// ```
/// use collection_schema_core::naming::pluralize;
///
/// assert_eq!(pluralize("user"), "users");
/// assert_eq!(pluralize("company"), "companies");
/// assert_eq!(pluralize("batch"), "batches");
/// ```
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    if name.ends_with('s') || name.ends_with('x') || name.ends_with('z')
        || name.ends_with("ch") || name.ends_with("sh")
    {
        return format!("{name}es");
    }

    if let Some(stem) = name.strip_suffix('y') {
        if stem.chars().last().is_some_and(is_consonant) {
            return format!("{stem}ies");
        }
    }

    format!("{name}s")
}

/// Singularizes the final word of a name, inverting [`pluralize`] on its
/// regular cases.
///
/// # Examples
///
/// ```
/// use collection_schema_core::naming::singularize;
///
/// assert_eq!(singularize("users"), "user");
/// assert_eq!(singularize("companies"), "company");
/// assert_eq!(singularize("boxes"), "box");
/// ```
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }

    if let Some(stem) = name.strip_suffix("es") {
        if stem.ends_with('s') || stem.ends_with('x') || stem.ends_with('z')
            || stem.ends_with("ch") || stem.ends_with("sh")
        {
            return stem.to_string();
        }
    }

    if name.ends_with('s') && !name.ends_with("ss") {
        return name[..name.len() - 1].to_string();
    }

    name.to_string()
}

fn is_consonant(ch: char) -> bool {
    ch.is_ascii_alphabetic() && !matches!(ch.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}
