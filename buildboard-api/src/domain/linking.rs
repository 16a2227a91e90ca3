use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Reasons a link-set replacement is rejected. Both variants carry every
/// offending name, not just the first, so the caller can show the user the
/// complete picture in one round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("These hackatime projects are already linked to another project: {}", .0.join(", "))]
    Conflict(Vec<String>),
    #[error("Hackatime projects not found: {}. Please refresh your hackatime stats first.", .0.join(", "))]
    UnknownActivities(Vec<String>),
}

/// The resolved replacement for a project's link set: the names to persist
/// and the recomputed hours. The two always change together.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkUpdate {
    pub names: Vec<String>,
    pub hours: Option<f64>,
}

impl LinkUpdate {
    pub fn cleared() -> Self {
        Self {
            names: Vec::new(),
            hours: None,
        }
    }
}

/// Decide the new link set for one project.
///
/// `linked_elsewhere` holds every activity name currently linked to any of
/// the user's *other* projects; `catalog` maps the user's Hackatime project
/// names to their tracked seconds. An activity name may be linked to at most
/// one project across the user's whole project set, so any requested name
/// found in `linked_elsewhere` is a conflict. Conflicts are reported before
/// unknown names.
///
/// An empty request clears the link set and nulls the hours without running
/// either check. Requested names are kept in the given order and are not
/// deduplicated, so a name supplied twice counts its seconds twice.
pub fn resolve_link_update(
    requested: &[String],
    linked_elsewhere: &HashSet<String>,
    catalog: &HashMap<String, i64>,
) -> Result<LinkUpdate, LinkError> {
    if requested.is_empty() {
        return Ok(LinkUpdate::cleared());
    }

    let conflicts: Vec<String> = requested
        .iter()
        .filter(|name| linked_elsewhere.contains(*name))
        .cloned()
        .collect();
    if !conflicts.is_empty() {
        return Err(LinkError::Conflict(conflicts));
    }

    let missing: Vec<String> = requested
        .iter()
        .filter(|name| !catalog.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(LinkError::UnknownActivities(missing));
    }

    let total_seconds: i64 = requested.iter().map(|name| catalog[name]).sum();

    Ok(LinkUpdate {
        names: requested.to_vec(),
        hours: Some(round_hours(total_seconds)),
    })
}

/// Convert tracked seconds to hours, rounded to two decimal places.
pub fn round_hours(total_seconds: i64) -> f64 {
    (total_seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn catalog(entries: &[(&str, i64)]) -> HashMap<String, i64> {
        entries
            .iter()
            .map(|(name, seconds)| (name.to_string(), *seconds))
            .collect()
    }

    #[test]
    fn sums_seconds_across_linked_activities() {
        let catalog = catalog(&[("game-jam", 3600), ("website", 1800)]);
        let update = resolve_link_update(
            &names(&["game-jam", "website"]),
            &HashSet::new(),
            &catalog,
        )
        .unwrap();

        assert_eq!(update.names, names(&["game-jam", "website"]));
        assert_eq!(update.hours, Some(1.5));
    }

    #[test]
    fn hours_are_rounded_to_two_decimals() {
        let catalog = catalog(&[("tiny", 100)]);
        let update = resolve_link_update(&names(&["tiny"]), &HashSet::new(), &catalog).unwrap();

        // 100 / 3600 = 0.02777...
        assert_eq!(update.hours, Some(0.03));
    }

    #[test]
    fn resolving_twice_yields_the_same_hours() {
        let catalog = catalog(&[("game-jam", 5400)]);
        let requested = names(&["game-jam"]);

        let first = resolve_link_update(&requested, &HashSet::new(), &catalog).unwrap();
        let second = resolve_link_update(&requested, &HashSet::new(), &catalog).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_request_clears_links_and_hours_without_validation() {
        // The catalog and conflict set would both reject these names if the
        // checks ran; an empty request must bypass them entirely.
        let linked_elsewhere: HashSet<String> = names(&["game-jam"]).into_iter().collect();
        let update = resolve_link_update(&[], &linked_elsewhere, &HashMap::new()).unwrap();

        assert_eq!(update, LinkUpdate::cleared());
        assert!(update.names.is_empty());
        assert_eq!(update.hours, None);
    }

    #[test]
    fn conflicting_names_are_all_reported() {
        let linked_elsewhere: HashSet<String> =
            names(&["game-jam", "website"]).into_iter().collect();
        let catalog = catalog(&[("game-jam", 3600), ("website", 1800), ("cli", 600)]);

        let err = resolve_link_update(
            &names(&["game-jam", "cli", "website"]),
            &linked_elsewhere,
            &catalog,
        )
        .unwrap_err();

        assert_eq!(err, LinkError::Conflict(names(&["game-jam", "website"])));
    }

    #[test]
    fn conflicts_are_checked_before_existence() {
        // "ghost" is not in the catalog, but the conflict on "game-jam" must
        // win because the conflict check runs first.
        let linked_elsewhere: HashSet<String> = names(&["game-jam"]).into_iter().collect();
        let catalog = catalog(&[("game-jam", 3600)]);

        let err = resolve_link_update(
            &names(&["game-jam", "ghost"]),
            &linked_elsewhere,
            &catalog,
        )
        .unwrap_err();

        assert_eq!(err, LinkError::Conflict(names(&["game-jam"])));
    }

    #[test]
    fn unknown_names_are_all_reported() {
        let catalog = catalog(&[("real", 3600)]);

        let err = resolve_link_update(
            &names(&["real", "ghost", "phantom"]),
            &HashSet::new(),
            &catalog,
        )
        .unwrap_err();

        assert_eq!(err, LinkError::UnknownActivities(names(&["ghost", "phantom"])));
    }

    #[test]
    fn duplicate_names_count_their_seconds_twice() {
        // Pass-through behavior: the request list is not deduplicated, so a
        // repeated name doubles its contribution.
        let catalog = catalog(&[("game-jam", 3600)]);

        let update = resolve_link_update(
            &names(&["game-jam", "game-jam"]),
            &HashSet::new(),
            &catalog,
        )
        .unwrap();

        assert_eq!(update.names, names(&["game-jam", "game-jam"]));
        assert_eq!(update.hours, Some(2.0));
    }

    #[test]
    fn order_of_requested_names_is_preserved() {
        let catalog = catalog(&[("a", 60), ("b", 60), ("c", 60)]);

        let update =
            resolve_link_update(&names(&["c", "a", "b"]), &HashSet::new(), &catalog).unwrap();

        assert_eq!(update.names, names(&["c", "a", "b"]));
    }
}
