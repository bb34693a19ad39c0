use {super::*, chrono::DateTime};

pub(crate) struct Story<'a> {
  item: &'a Item,
}

impl<'a> Story<'a> {
  const HEADLINE_WIDTH: usize = 60;

  fn author(&self) -> &str {
    self.item.by().unwrap_or("Unknown")
  }

  fn body(&self) -> Option<String> {
    self
      .item
      .text()
      .map(sanitize_text)
      .filter(|text| !text.is_empty())
  }

  /// Comments carry no `descendants` field, so their direct replies are
  /// counted instead.
  fn comments(&self) -> i64 {
    if self.item.get("descendants").is_some() {
      self.item.descendants()
    } else {
      i64::try_from(self.item.kids().len()).unwrap_or(i64::MAX)
    }
  }

  /// One line summary used when following the update feed.
  pub(crate) fn headline(&self) -> String {
    let summary = self
      .item
      .title()
      .map(str::to_owned)
      .or_else(|| self.body())
      .unwrap_or_default();

    format!(
      "{} [{}] {} by {}",
      self.item.id(),
      self.item.kind().unwrap_or("unknown"),
      truncate(&summary, Self::HEADLINE_WIDTH),
      self.author()
    )
  }

  pub(crate) fn new(item: &'a Item) -> Self {
    Self { item }
  }

  fn time(&self) -> String {
    self
      .item
      .time()
      .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
      .map_or_else(
        || "Unknown".into(),
        |time| time.format("%m/%d/%Y %I:%M %p").to_string(),
      )
  }
}

impl Display for Story<'_> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    writeln!(f, "{}", self.item.title().unwrap_or("No title available"))?;
    writeln!(f, "{}", self.item.url().unwrap_or("No URL available"))?;
    writeln!(f)?;

    match self.body() {
      Some(body) => {
        for line in wrap_text(&body, WRAP_WIDTH) {
          writeln!(f, "{line}")?;
        }
      }
      None => writeln!(f, "---")?,
    }

    writeln!(f)?;
    writeln!(f, "By: {}", self.author())?;
    writeln!(f, "Score: {}", format_points(self.item.score()))?;
    writeln!(f, "Comments: {}", self.comments())?;
    write!(f, "Time: {}", self.time())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(body: &str) -> Item {
    Item::from_body(body).unwrap().unwrap()
  }

  #[test]
  fn renders_full_story() {
    let item = item(
      r#"{
        "by": "dhouston",
        "descendants": 71,
        "id": 8863,
        "score": 104,
        "time": 1175714200,
        "title": "My YC app: Dropbox - Throw away your USB drive",
        "type": "story",
        "url": "http://www.getdropbox.com/u/2/screencast.html"
      }"#,
    );

    assert_eq!(
      Story::new(&item).to_string(),
      "\
My YC app: Dropbox - Throw away your USB drive
http://www.getdropbox.com/u/2/screencast.html

---

By: dhouston
Score: 104 points
Comments: 71
Time: 04/04/2007 07:16 PM"
    );
  }

  #[test]
  fn renders_placeholders_for_missing_fields() {
    let item = item(r#"{"id": 1, "type": "story"}"#);

    assert_eq!(
      Story::new(&item).to_string(),
      "\
No title available
No URL available

---

By: Unknown
Score: 0 points
Comments: 0
Time: Unknown"
    );
  }

  #[test]
  fn counts_direct_replies_without_descendants() {
    let item = item(
      r#"{"id": 2921983, "type": "comment", "kids": [2922097, 2922429]}"#,
    );

    assert!(Story::new(&item).to_string().contains("\nComments: 2\n"));
  }

  #[test]
  fn renders_sanitized_text_body() {
    let item = item(
      r#"{"id": 121003, "type": "story", "title": "Ask HN: The Arc Effect",
          "text": "<i>or</i> HN: the Next Iteration<p>I get the impression &amp; more."}"#,
    );

    let rendered = Story::new(&item).to_string();

    assert!(rendered.contains(
      "\n\nor HN: the Next Iteration I get the impression & more.\n\n"
    ));
  }

  #[test]
  fn headline_falls_back_to_text() {
    let item = item(
      r#"{"id": 2921983, "type": "comment", "by": "norvig",
          "text": "Aw shucks, guys ... you make me blush with your compliments."}"#,
    );

    assert_eq!(
      Story::new(&item).headline(),
      "2921983 [comment] Aw shucks, guys ... you make me blush with your \
       compliments. by norvig"
    );
  }

  #[test]
  fn headline_truncates_long_titles() {
    let title = "word ".repeat(20);

    let item =
      item(&format!(r#"{{"id": 5, "type": "story", "title": "{title}"}}"#));

    assert!(
      Story::new(&item)
        .headline()
        .starts_with("5 [story] word word")
    );

    assert!(Story::new(&item).headline().ends_with("... by Unknown"));
  }
}
