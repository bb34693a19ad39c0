use super::*;

pub(crate) fn deserialize_seconds<'de, D>(
  deserializer: D,
) -> Result<Duration, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;

  let seconds = match &value {
    Value::Number(n) => n.as_f64(),
    Value::Null => {
      return Err(de::Error::invalid_type(Unexpected::Unit, &"seconds"));
    }
    Value::Bool(b) => {
      return Err(de::Error::invalid_type(Unexpected::Bool(*b), &"seconds"));
    }
    Value::String(s) => {
      return Err(de::Error::invalid_type(Unexpected::Str(s), &"seconds"));
    }
    Value::Array(_) => {
      return Err(de::Error::invalid_type(Unexpected::Seq, &"seconds"));
    }
    Value::Object(_) => {
      return Err(de::Error::invalid_type(Unexpected::Map, &"seconds"));
    }
  };

  seconds
    .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    .ok_or_else(|| {
      de::Error::invalid_value(
        Unexpected::Other(&value.to_string()),
        &"a non-negative number of seconds",
      )
    })
}

pub(crate) fn format_points(score: i64) -> String {
  match score {
    1 => "1 point".to_string(),
    _ => format!("{score} points"),
  }
}

pub(crate) fn sanitize_text(text: &str) -> String {
  let mut cleaned = String::with_capacity(text.len());
  let mut inside_tag = false;
  let mut last_was_space = false;

  for ch in text.chars() {
    match ch {
      '<' => {
        inside_tag = true;

        if !last_was_space {
          cleaned.push(' ');
          last_was_space = true;
        }
      }
      '>' => {
        inside_tag = false;
      }
      _ if inside_tag => {}
      _ if ch.is_whitespace() => {
        if !last_was_space {
          cleaned.push(' ');
          last_was_space = true;
        }
      }
      _ => {
        cleaned.push(ch);
        last_was_space = false;
      }
    }
  }

  let decoded = html_escape::decode_html_entities(cleaned.trim());

  decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
  if text.chars().count() <= max_chars {
    return text.to_string();
  }

  let mut result = text.chars().take(max_chars).collect::<String>();

  result.truncate(result.trim_end().len());
  result.push_str("...");

  result
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_width = 0;

  for word in text.split_whitespace() {
    let word_width = word.chars().count();

    if current.is_empty() {
      current.push_str(word);
      current_width = word_width;
    } else if current_width + 1 + word_width <= width {
      current.push(' ');
      current.push_str(word);
      current_width += 1 + word_width;
    } else {
      lines.push(std::mem::take(&mut current));
      current.push_str(word);
      current_width = word_width;
    }
  }

  if !current.is_empty() {
    lines.push(current);
  }

  lines
}
