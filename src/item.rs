use super::*;

/// A story, comment, job or poll as served by the item store.
///
/// The origin enforces no schema, so fields are read on demand and fall back
/// to defaults instead of failing the fetch.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Item(Map<String, Value>);

impl Item {
  pub(crate) fn by(&self) -> Option<&str> {
    self.string("by")
  }

  pub(crate) fn descendants(&self) -> i64 {
    self.integer("descendants").unwrap_or_default()
  }

  /// Decodes a response body. Empty bodies, `null` and `{}` mean the origin
  /// had nothing to serve yet and yield `None`.
  pub(crate) fn from_body(body: &str) -> Result<Option<Self>, Error> {
    if body.trim().is_empty() {
      return Ok(None);
    }

    match serde_json::from_str::<Value>(body)? {
      Value::Null => Ok(None),
      Value::Object(fields) if fields.is_empty() => Ok(None),
      Value::Object(fields) => Ok(Some(Self(fields))),
      other => Err(Error::Decode {
        reason: format!("expected an item object, found `{other}`"),
      }),
    }
  }

  /// Raw access to any field, including ones without an accessor.
  pub(crate) fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub(crate) fn id(&self) -> u64 {
    self.get("id").and_then(Value::as_u64).unwrap_or_default()
  }

  fn integer(&self, key: &str) -> Option<i64> {
    self.get(key).and_then(Value::as_i64)
  }

  pub(crate) fn is_story(&self) -> bool {
    self.kind() == Some("story")
  }

  /// Child comment ids in ranked display order.
  pub(crate) fn kids(&self) -> Vec<u64> {
    self
      .get("kids")
      .and_then(Value::as_array)
      .map(|kids| kids.iter().filter_map(Value::as_u64).collect())
      .unwrap_or_default()
  }

  pub(crate) fn kind(&self) -> Option<&str> {
    self.string("type")
  }

  pub(crate) fn score(&self) -> i64 {
    self.integer("score").unwrap_or_default()
  }

  fn string(&self, key: &str) -> Option<&str> {
    self
      .get(key)
      .and_then(Value::as_str)
      .filter(|value| !value.is_empty())
  }

  pub(crate) fn text(&self) -> Option<&str> {
    self.string("text")
  }

  pub(crate) fn time(&self) -> Option<i64> {
    self.integer("time")
  }

  pub(crate) fn title(&self) -> Option<&str> {
    self.string("title")
  }

  pub(crate) fn url(&self) -> Option<&str> {
    self.string("url")
  }
}
