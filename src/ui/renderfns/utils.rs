/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else if max_len < 3 {
    s.chars().take(max_len).collect()
  } else {
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
  }
}
