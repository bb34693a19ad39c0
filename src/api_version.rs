use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiVersion {
  V0,
}

impl ApiVersion {
  const ALL: &[ApiVersion] = &[ApiVersion::V0];

  pub(crate) fn base_url(self) -> &'static str {
    match self {
      Self::V0 => "https://hacker-news.firebaseio.com",
    }
  }

  pub(crate) fn item_url(self, id: u64) -> String {
    format!("{}/{self}/item/{id}.json", self.base_url())
  }

  pub(crate) fn max_item_url(self) -> String {
    format!("{}/{self}/maxitem.json", self.base_url())
  }

  pub(crate) fn name(self) -> &'static str {
    match self {
      Self::V0 => "v0",
    }
  }

  pub(crate) fn top_stories_url(self) -> String {
    format!("{}/{self}/topstories.json", self.base_url())
  }
}

impl Display for ApiVersion {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for ApiVersion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|version| version.name() == s)
      .ok_or_else(|| Error::UnsupportedVersion {
        version: s.to_string(),
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_supported_version() {
    assert_eq!("v0".parse::<ApiVersion>().unwrap(), ApiVersion::V0);
  }

  #[test]
  fn rejects_unknown_version() {
    assert!(matches!(
      "v1".parse::<ApiVersion>(),
      Err(Error::UnsupportedVersion { version }) if version == "v1"
    ));
  }

  #[test]
  fn builds_versioned_endpoints() {
    assert_eq!(
      ApiVersion::V0.item_url(8863),
      "https://hacker-news.firebaseio.com/v0/item/8863.json"
    );

    assert_eq!(
      ApiVersion::V0.top_stories_url(),
      "https://hacker-news.firebaseio.com/v0/topstories.json"
    );

    assert_eq!(
      ApiVersion::V0.max_item_url(),
      "https://hacker-news.firebaseio.com/v0/maxitem.json"
    );
  }
}
