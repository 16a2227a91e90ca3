use std::collections::HashMap;

use serde::Deserialize;

/// Project names used by Hackatime as internal placeholders. Entries with
/// these names never map to real projects and are dropped during aggregation.
const PLACEHOLDER_NAMES: [&str; 2] = ["<<LAST_PROJECT>>", "Other"];

/// Envelope returned by the Hackatime stats endpoint.
#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub data: StatsData,
}

#[derive(Debug, Deserialize)]
pub struct StatsData {
    pub status: String,
    #[serde(default)]
    pub projects: Vec<RawProjectStats>,
}

/// A single project row as reported by Hackatime. The same name can appear
/// more than once in a response, so rows are aggregated before use.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectStats {
    pub name: Option<String>,
    #[serde(default)]
    pub total_seconds: i64,
}

/// Cumulative seconds tracked against one project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    pub name: String,
    pub seconds: i64,
}

/// Collapse raw stats rows into one entry per project name, summing seconds
/// and dropping unnamed and placeholder rows. First-seen order is kept.
pub fn aggregate_projects(raw: Vec<RawProjectStats>) -> Vec<ProjectStats> {
    let mut order: Vec<String> = Vec::new();
    let mut seconds_by_name: HashMap<String, i64> = HashMap::new();

    for row in raw {
        let Some(name) = row.name else {
            continue;
        };
        if name.is_empty() || PLACEHOLDER_NAMES.contains(&name.as_str()) {
            continue;
        }

        match seconds_by_name.get_mut(&name) {
            Some(total) => *total += row.total_seconds,
            None => {
                seconds_by_name.insert(name.clone(), row.total_seconds);
                order.push(name);
            }
        }
    }

    order
        .into_iter()
        .map(|name| {
            let seconds = seconds_by_name[&name];
            ProjectStats { name, seconds }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{aggregate_projects, RawProjectStats};

    fn raw(name: Option<&str>, total_seconds: i64) -> RawProjectStats {
        RawProjectStats {
            name: name.map(str::to_string),
            total_seconds,
        }
    }

    #[test]
    fn aggregate_sums_duplicate_names() {
        let projects = aggregate_projects(vec![
            raw(Some("game-jam"), 1200),
            raw(Some("website"), 600),
            raw(Some("game-jam"), 300),
        ]);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "game-jam");
        assert_eq!(projects[0].seconds, 1500);
        assert_eq!(projects[1].name, "website");
        assert_eq!(projects[1].seconds, 600);
    }

    #[test]
    fn aggregate_drops_placeholders_and_unnamed_rows() {
        let projects = aggregate_projects(vec![
            raw(Some("<<LAST_PROJECT>>"), 999),
            raw(Some("Other"), 999),
            raw(None, 999),
            raw(Some(""), 999),
            raw(Some("real-project"), 60),
        ]);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "real-project");
    }
}
