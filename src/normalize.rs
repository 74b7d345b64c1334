//! Input normalizer: resolves the historical correctness-spec shapes into
//! canonical index-based form before any game logic runs.
//!
//! Three spec families repeat the same pattern: match pairs (matching /
//! column-matching / connection), category assignment (category) and timeline
//! order. Text references resolve by first occurrence; unresolved references
//! and out-of-range indices are returned as errors so the caller decides
//! whether to degrade or reject, instead of being silently dropped.

use crate::domain::{CategorySpec, MatchSpec, NormalizedMatch, OrderSpec};

/// Why a correctness spec could not be normalized.
#[derive(Debug, PartialEq, Eq)]
pub enum NormalizeError {
  /// A text reference has no occurrence in its source sequence.
  UnresolvedText { side: &'static str, text: String },
  /// An index reference points outside its source sequence.
  IndexOutOfRange { side: &'static str, index: usize, len: usize },
  /// The spec is empty (nothing would ever be placeable).
  EmptySpec,
}

impl std::fmt::Display for NormalizeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NormalizeError::UnresolvedText { side, text } => {
        write!(f, "{} reference \"{}\" not found in its sequence", side, text)
      }
      NormalizeError::IndexOutOfRange { side, index, len } => {
        write!(f, "{} index {} out of range (sequence length {})", side, index, len)
      }
      NormalizeError::EmptySpec => write!(f, "correctness spec is empty"),
    }
  }
}

impl std::error::Error for NormalizeError {}

fn check_index(side: &'static str, index: usize, len: usize) -> Result<usize, NormalizeError> {
  if index < len { Ok(index) } else { Err(NormalizeError::IndexOutOfRange { side, index, len }) }
}

fn resolve_text(side: &'static str, text: &str, seq: &[String]) -> Result<usize, NormalizeError> {
  // First-occurrence lookup. Duplicate texts resolve to the first position.
  seq.iter()
    .position(|s| s == text)
    .ok_or_else(|| NormalizeError::UnresolvedText { side, text: text.to_string() })
}

/// Resolve match specs against the two source sequences.
/// Every returned pair has both indices within bounds.
pub fn normalize_matches(
  specs: &[MatchSpec],
  left_seq: &[String],
  right_seq: &[String],
) -> Result<Vec<NormalizedMatch>, NormalizeError> {
  if specs.is_empty() {
    return Err(NormalizeError::EmptySpec);
  }
  specs
    .iter()
    .map(|spec| {
      let (left, right) = match spec {
        MatchSpec::Index { left, right } => (
          check_index("left", *left, left_seq.len())?,
          check_index("right", *right, right_seq.len())?,
        ),
        MatchSpec::Text { left, right } => (
          resolve_text("left", left, left_seq)?,
          resolve_text("right", right, right_seq)?,
        ),
      };
      Ok(NormalizedMatch { left, right })
    })
    .collect()
}

/// Resolve category specs into a per-item category index: `result[i]` is the
/// correct category of item `i`. Every item must be covered exactly once.
pub fn normalize_categories(
  specs: &[CategorySpec],
  items: &[String],
  category_names: &[String],
) -> Result<Vec<usize>, NormalizeError> {
  if specs.is_empty() {
    return Err(NormalizeError::EmptySpec);
  }
  let mut assigned: Vec<Option<usize>> = vec![None; items.len()];
  for spec in specs {
    let (item, category) = match spec {
      CategorySpec::ByIndex { item, category } => (
        check_index("item", *item, items.len())?,
        check_index("category", *category, category_names.len())?,
      ),
      CategorySpec::ByName { item, category } => (
        resolve_text("item", item, items)?,
        resolve_text("category", category, category_names)?,
      ),
    };
    assigned[item] = Some(category);
  }
  assigned
    .into_iter()
    .enumerate()
    .map(|(i, slot)| {
      slot.ok_or_else(|| NormalizeError::UnresolvedText {
        side: "item",
        text: items[i].clone(),
      })
    })
    .collect()
}

/// Resolve an order spec into per-event target positions: `result[i]` is the
/// slot event `i` belongs in. A plain position list shorter than the event
/// list falls back to identity for the tail (historical data tolerance).
pub fn normalize_order(spec: &OrderSpec, events: &[String]) -> Result<Vec<usize>, NormalizeError> {
  let positions = match spec {
    OrderSpec::Positions(order) => {
      if order.is_empty() {
        return Err(NormalizeError::EmptySpec);
      }
      events
        .iter()
        .enumerate()
        .map(|(i, _)| check_index("order", *order.get(i).unwrap_or(&i), events.len()))
        .collect::<Result<Vec<_>, _>>()?
    }
    OrderSpec::Labeled(entries) => {
      if entries.is_empty() {
        return Err(NormalizeError::EmptySpec);
      }
      let mut positions: Vec<usize> = (0..events.len()).collect();
      for entry in entries {
        let event = resolve_text("event", &entry.text, events)?;
        positions[event] = check_index("order", entry.order, events.len())?;
      }
      positions
    }
  };
  Ok(positions)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::OrderEntry;

  fn seq(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn index_pairs_pass_through_in_bounds() {
    let left = seq(&["GET", "POST"]);
    let right = seq(&["read", "create"]);
    let specs = [
      MatchSpec::Index { left: 0, right: 0 },
      MatchSpec::Index { left: 1, right: 1 },
    ];
    let out = normalize_matches(&specs, &left, &right).unwrap();
    assert_eq!(out, vec![
      NormalizedMatch { left: 0, right: 0 },
      NormalizedMatch { left: 1, right: 1 },
    ]);
    for m in &out {
      assert!(m.left < left.len() && m.right < right.len());
    }
  }

  #[test]
  fn text_pairs_resolve_to_first_occurrence() {
    let left = seq(&["GET", "POST", "GET"]);
    let right = seq(&["read", "create"]);
    let specs = [MatchSpec::Text { left: "GET".into(), right: "create".into() }];
    let out = normalize_matches(&specs, &left, &right).unwrap();
    assert_eq!(out, vec![NormalizedMatch { left: 0, right: 1 }]);
  }

  #[test]
  fn unresolved_text_is_an_error() {
    let left = seq(&["GET"]);
    let right = seq(&["read"]);
    let specs = [MatchSpec::Text { left: "DELETE".into(), right: "read".into() }];
    let err = normalize_matches(&specs, &left, &right).unwrap_err();
    assert_eq!(err, NormalizeError::UnresolvedText { side: "left", text: "DELETE".into() });
  }

  #[test]
  fn out_of_range_index_is_rejected() {
    let left = seq(&["GET"]);
    let right = seq(&["read"]);
    let specs = [MatchSpec::Index { left: 3, right: 0 }];
    let err = normalize_matches(&specs, &left, &right).unwrap_err();
    assert_eq!(err, NormalizeError::IndexOutOfRange { side: "left", index: 3, len: 1 });
  }

  #[test]
  fn empty_spec_is_rejected() {
    assert_eq!(normalize_matches(&[], &seq(&["a"]), &seq(&["b"])).unwrap_err(), NormalizeError::EmptySpec);
  }

  #[test]
  fn categories_by_name_and_index() {
    let items = seq(&["JSON", "XML"]);
    let cats = seq(&["text", "binary"]);
    let by_name = [
      CategorySpec::ByName { item: "JSON".into(), category: "text".into() },
      CategorySpec::ByName { item: "XML".into(), category: "text".into() },
    ];
    assert_eq!(normalize_categories(&by_name, &items, &cats).unwrap(), vec![0, 0]);

    let by_index = [
      CategorySpec::ByIndex { item: 0, category: 1 },
      CategorySpec::ByIndex { item: 1, category: 0 },
    ];
    assert_eq!(normalize_categories(&by_index, &items, &cats).unwrap(), vec![1, 0]);
  }

  #[test]
  fn uncovered_item_is_an_error() {
    let items = seq(&["JSON", "XML"]);
    let cats = seq(&["text"]);
    let specs = [CategorySpec::ByIndex { item: 0, category: 0 }];
    assert!(normalize_categories(&specs, &items, &cats).is_err());
  }

  #[test]
  fn order_positions_and_labels() {
    let events = seq(&["X", "Y", "Z"]);
    assert_eq!(
      normalize_order(&OrderSpec::Positions(vec![0, 1, 2]), &events).unwrap(),
      vec![0, 1, 2]
    );
    let labeled = OrderSpec::Labeled(vec![
      OrderEntry { text: "Z".into(), order: 0 },
      OrderEntry { text: "X".into(), order: 2 },
      OrderEntry { text: "Y".into(), order: 1 },
    ]);
    assert_eq!(normalize_order(&labeled, &events).unwrap(), vec![2, 1, 0]);
  }

  #[test]
  fn short_position_list_falls_back_to_identity() {
    let events = seq(&["X", "Y", "Z"]);
    assert_eq!(
      normalize_order(&OrderSpec::Positions(vec![1, 0]), &events).unwrap(),
      vec![1, 0, 2]
    );
  }
}
