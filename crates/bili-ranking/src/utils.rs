/// Generates a fake BUVID3 identifier for Bilibili API requests.
///
/// The web API answers anonymous requests without a `buvid3` cookie with risk
/// control errors. A random UUID, uppercased and without hyphens, is laid out
/// as `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXXinfoc`.
pub fn generate_fake_buvid3() -> String {
    let u = uuid::Uuid::new_v4();
    let u_str = u.to_string().to_uppercase().replace('-', "");
    format!(
        "{}-{}-{}-{}-{}infoc",
        &u_str[0..8],
        &u_str[8..12],
        &u_str[12..16],
        &u_str[16..20],
        &u_str[20..]
    )
}

/// Cuts `s` to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
