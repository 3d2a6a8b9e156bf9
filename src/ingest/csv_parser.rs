use tracing::debug;
use crate::error::{MetricError, MetricResult};
use crate::member::Member;

/// Parses `name,rawCount` rows and normalizes the counts into shares.
///
/// All-or-nothing: the first malformed row fails the whole batch and no
/// partial group is returned. Members come back in input order with tickets
/// left at their placeholder values (0 of 1).
pub fn parse_group(text: &str) -> MetricResult<Vec<Member>> {
    let rows = parse_rows(text)?;
    if rows.is_empty() {
        return Err(MetricError::Format("no records found in input".to_string()));
    }

    let total = rows.iter().try_fold(0u64, |acc, (_, count)| acc.checked_add(*count))
        .ok_or_else(|| MetricError::Format("attributed line counts overflow when summed".to_string()))?;
    if total == 0 {
        return Err(MetricError::Format("cannot normalize an all-zero distribution".to_string()));
    }
    debug!(rows = rows.len(), total, "normalizing contribution counts");

    let total = total as f64;
    rows.into_iter()
        .map(|(name, count)| Member::default().with_name(name).with_share(count as f64 / total))
        .collect()
}

/// Splits input into `(name, rawCount)` pairs without normalizing.
pub fn parse_rows(text: &str) -> MetricResult<Vec<(String, u64)>> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() { continue; }

        let fields = split_record(line)
            .map_err(|e| MetricError::Format(format!("{e} (line {line_no})")))?;
        if fields.len() != 2 {
            return Err(MetricError::Format(format!(
                "incorrect number of fields detected in CSV data (line {line_no}: found {})",
                fields.len()
            )));
        }

        let mut fields = fields.into_iter();
        // padding is tolerated around the name only; the count must be exact
        let name = fields.next().unwrap_or_default().trim().to_string();
        let raw  = fields.next().unwrap_or_default();
        let count: u64 = raw.parse().map_err(|_| MetricError::Format(format!(
            "line count must be a non-negative integer, got \"{raw}\" (line {line_no})"
        )))?;

        rows.push((name, count));
    }

    Ok(rows)
}

/// Splits one CSV record. Fields may be double-quoted, with `""` standing for a
/// literal quote. Fields come back untrimmed.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => { chars.next(); field.push('"'); }
                '"' => in_quotes = false,
                _   => field.push(c),
            }
            continue;
        }
        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '"' if field.trim().is_empty() && !quoted => {
                field.clear();
                quoted = true;
                in_quotes = true;
            }
            '"' => return Err("unexpected quote inside field".to_string()),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}
