//! Small utility helpers used across modules.

/// Normalize an answer string for lenient comparison: trim and lowercase.
/// Used for the default (mcq / true-false-as-text) answer check.
pub fn loose_text(s: &str) -> String {
  s.trim().to_lowercase()
}

/// Collapse all whitespace runs into single spaces and trim.
/// Used for the "fix-json-editor" answer comparison where indentation
/// differences must not count against the learner.
pub fn collapse_ws(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge stored game-content payloads.
/// The cut backs up to a char boundary so multibyte content never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loose_text_trims_and_lowercases() {
    assert_eq!(loose_text("  WebSocket "), "websocket");
  }

  #[test]
  fn collapse_ws_flattens_indentation() {
    assert_eq!(collapse_ws("{\n  \"a\": 1\n}"), "{ \"a\": 1 }");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    // One ASCII byte up front puts every two-byte 'é' across the cut offset.
    let s = format!("x{}", "é".repeat(200));
    let out = trunc_for_log(&s, 300);
    assert!(out.starts_with('x'));
    assert!(out.ends_with("(401 bytes total)"));

    assert_eq!(trunc_for_log("déjà", 100), "déjà");
  }
}
