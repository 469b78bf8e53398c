/// Independent toggles for cleaning up group labels. Steps always run in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeautifyOptions {
    pub remove_leading_digits: bool,
    pub replace_underscore: bool,
    pub break_camelcase: bool,
}

pub fn beautify_group(group: &str, options: &BeautifyOptions) -> String {
    let mut group = group.to_string();
    if options.remove_leading_digits {
        group = group.trim_start_matches(|c: char| c.is_ascii_digit()).to_string();
    }
    if options.replace_underscore {
        group = group.replace('_', " ");
    }
    if options.break_camelcase {
        group = break_camelcase(&group);
    }
    group.trim().to_string()
}

/// Inserts a space at `aB` transitions and before the last capital of an
/// uppercase run followed by lowercase (`HTTPServer` -> `HTTP Server`).
pub fn break_camelcase(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_ascii_lowercase() && c.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase()
                && c.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if lower_to_upper || acronym_end {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}
