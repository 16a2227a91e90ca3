use serde::Serialize;

use crate::domain::models::Project;

/// Hours of tracked time required for the top visibility tier.
pub const HOURS_THRESHOLD: f64 = 30.0;

const HOURS_MILESTONE_ID: &str = "hours";

/// Discrete exposure tiers, ordered. Conditions are cumulative: a project
/// cannot hold a tier without satisfying every lower tier's conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VisibilityLevel {
    Hidden = 1,
    Local = 2,
    Community = 3,
    Featured = 4,
    Billboard = 5,
}

impl VisibilityLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            VisibilityLevel::Hidden => "Hidden",
            VisibilityLevel::Local => "Local",
            VisibilityLevel::Community => "Community",
            VisibilityLevel::Featured => "Featured",
            VisibilityLevel::Billboard => "Billboard",
        }
    }

    pub fn next(self) -> Option<VisibilityLevel> {
        match self {
            VisibilityLevel::Hidden => Some(VisibilityLevel::Local),
            VisibilityLevel::Local => Some(VisibilityLevel::Community),
            VisibilityLevel::Community => Some(VisibilityLevel::Featured),
            VisibilityLevel::Featured => Some(VisibilityLevel::Billboard),
            VisibilityLevel::Billboard => None,
        }
    }
}

/// Snapshot of the facts the tier derivation reads. Built fresh on every
/// call; the tier itself is never stored.
#[derive(Debug, Clone, Copy)]
struct VisibilityState {
    has_github: bool,
    has_hackatime: bool,
    is_shipped: bool,
    is_approved: bool,
    hackatime_hours: f64,
    has_enough_hours: bool,
}

impl VisibilityState {
    fn from_project(project: &Project, has_approved_review: bool) -> Self {
        let hackatime_hours = project.hours_or_zero();

        Self {
            has_github: project.has_code_link(),
            has_hackatime: project.has_hackatime_link(),
            is_shipped: project.shipped,
            is_approved: has_approved_review,
            hackatime_hours,
            has_enough_hours: hackatime_hours >= HOURS_THRESHOLD,
        }
    }

    fn is_connected(&self) -> bool {
        self.has_github && self.has_hackatime
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityMilestone {
    pub id: &'static str,
    pub name: &'static str,
    pub description: String,
    pub completed: bool,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityStatus {
    pub current_level: u8,
    pub current_level_name: &'static str,
    pub next_level: Option<u8>,
    pub next_level_name: Option<&'static str>,
    pub progress_percentage: i32,
    pub milestones: Vec<VisibilityMilestone>,
    pub total_completed: usize,
    pub total_milestones: usize,
}

fn determine_level(state: &VisibilityState) -> VisibilityLevel {
    let connected = state.is_connected();

    if connected && state.is_shipped && state.is_approved && state.has_enough_hours {
        return VisibilityLevel::Billboard;
    }

    if connected && state.is_shipped && state.is_approved {
        return VisibilityLevel::Featured;
    }

    if connected && state.is_shipped {
        return VisibilityLevel::Community;
    }

    if connected {
        return VisibilityLevel::Local;
    }

    VisibilityLevel::Hidden
}

/// Each milestone reads exactly one fact; completion of one never depends
/// on another, so the UI can show later milestones done while earlier ones
/// are not.
fn milestones(state: &VisibilityState) -> Vec<VisibilityMilestone> {
    vec![
        VisibilityMilestone {
            id: "github",
            name: "Link GitHub",
            description: "Connect your GitHub repository".to_string(),
            completed: state.has_github,
            level: VisibilityLevel::Local.rank(),
        },
        VisibilityMilestone {
            id: "hackatime",
            name: "Link Hackatime",
            description: "Connect your Hackatime project to track hours".to_string(),
            completed: state.has_hackatime,
            level: VisibilityLevel::Local.rank(),
        },
        VisibilityMilestone {
            id: "shipped",
            name: "Ship It",
            description: "Mark your project as shipped".to_string(),
            completed: state.is_shipped,
            level: VisibilityLevel::Community.rank(),
        },
        VisibilityMilestone {
            id: "approved",
            name: "Get Approved",
            description: "Submit for admin review and get approved".to_string(),
            completed: state.is_approved,
            level: VisibilityLevel::Featured.rank(),
        },
        VisibilityMilestone {
            id: HOURS_MILESTONE_ID,
            name: "Log 30+ Hours",
            description: format!(
                "Track at least {} hours in Hackatime",
                HOURS_THRESHOLD as i32
            ),
            completed: state.has_enough_hours,
            level: VisibilityLevel::Billboard.rank(),
        },
    ]
}

/// 100 points split evenly across the milestones. The hours milestone earns
/// its share fractionally (`hours / 30`, capped at 1) so projects get
/// partial credit below the threshold; every other milestone is
/// all-or-nothing. The sum is truncated to a whole percentage.
fn calculate_progress(milestones: &[VisibilityMilestone], state: &VisibilityState) -> i32 {
    let base_per_milestone = 100.0 / milestones.len() as f64;
    let mut progress = 0.0;

    for milestone in milestones {
        if milestone.id == HOURS_MILESTONE_ID {
            let hours_fraction = (state.hackatime_hours / HOURS_THRESHOLD).min(1.0);
            progress += base_per_milestone * hours_fraction;
        } else if milestone.completed {
            progress += base_per_milestone;
        }
    }

    progress as i32
}

/// Derive a project's visibility tier, milestones, and progress from its
/// current facts. Pure; never fails, and treats null hours as zero.
pub fn calculate_visibility(project: &Project, has_approved_review: bool) -> VisibilityStatus {
    let state = VisibilityState::from_project(project, has_approved_review);
    let milestones = milestones(&state);
    let current_level = determine_level(&state);

    let completed_count = milestones.iter().filter(|m| m.completed).count();
    let total_count = milestones.len();

    let next_level = current_level.next();
    let progress = calculate_progress(&milestones, &state);

    VisibilityStatus {
        current_level: current_level.rank(),
        current_level_name: current_level.name(),
        next_level: next_level.map(VisibilityLevel::rank),
        next_level_name: next_level.map(VisibilityLevel::name),
        progress_percentage: progress,
        milestones,
        total_completed: completed_count,
        total_milestones: total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ProjectId, UserId};
    use time::OffsetDateTime;

    fn project() -> Project {
        Project {
            project_id: ProjectId::new("p1"),
            user_id: UserId::new("u1"),
            project_name: "Synth".to_string(),
            project_description: "A synthesizer".to_string(),
            project_type: None,
            attachment_urls: None,
            code_url: None,
            live_url: None,
            submission_week: "week-1".to_string(),
            shipped: false,
            github_installation_id: None,
            github_repo_path: None,
            hackatime_projects: None,
            hackatime_hours: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn connected_project() -> Project {
        let mut p = project();
        p.code_url = Some("https://github.com/u1/synth".to_string());
        p.hackatime_projects = Some(vec!["synth".to_string()]);
        p
    }

    #[test]
    fn bare_project_is_hidden_with_zero_progress() {
        let status = calculate_visibility(&project(), false);

        assert_eq!(status.current_level, 1);
        assert_eq!(status.current_level_name, "Hidden");
        assert_eq!(status.next_level, Some(2));
        assert_eq!(status.next_level_name, Some("Local"));
        assert_eq!(status.progress_percentage, 0);
        assert_eq!(status.total_completed, 0);
        assert_eq!(status.total_milestones, 5);
    }

    #[test]
    fn connected_project_is_local() {
        let status = calculate_visibility(&connected_project(), false);

        assert_eq!(status.current_level, 2);
        assert_eq!(status.current_level_name, "Local");
    }

    #[test]
    fn github_alone_is_not_connected() {
        let mut p = project();
        p.code_url = Some("https://github.com/u1/synth".to_string());

        let status = calculate_visibility(&p, false);

        assert_eq!(status.current_level_name, "Hidden");
    }

    #[test]
    fn unshipped_project_with_enough_hours_stays_local() {
        // Hours beyond the threshold cannot skip the shipped gate; the chain
        // is cumulative.
        let mut p = connected_project();
        p.hackatime_hours = Some(45.0);

        let status = calculate_visibility(&p, false);

        assert_eq!(status.current_level_name, "Local");
    }

    #[test]
    fn shipped_and_connected_is_community() {
        let mut p = connected_project();
        p.shipped = true;

        let status = calculate_visibility(&p, false);

        assert_eq!(status.current_level, 3);
        assert_eq!(status.current_level_name, "Community");
    }

    #[test]
    fn approval_without_shipping_does_not_reach_featured() {
        let mut p = connected_project();
        p.hackatime_hours = Some(45.0);

        let status = calculate_visibility(&p, true);

        assert_eq!(status.current_level_name, "Local");
    }

    #[test]
    fn approved_shipped_project_is_featured() {
        let mut p = connected_project();
        p.shipped = true;

        let status = calculate_visibility(&p, true);

        assert_eq!(status.current_level, 4);
        assert_eq!(status.current_level_name, "Featured");
    }

    #[test]
    fn billboard_requires_the_full_chain() {
        let mut p = connected_project();
        p.shipped = true;
        p.hackatime_hours = Some(30.0);

        let status = calculate_visibility(&p, true);

        assert_eq!(status.current_level, 5);
        assert_eq!(status.current_level_name, "Billboard");
        assert_eq!(status.next_level, None);
        assert_eq!(status.next_level_name, None);
        assert_eq!(status.progress_percentage, 100);
    }

    #[test]
    fn milestones_complete_independently_of_tier() {
        // Shipped but not connected: the project is Hidden, yet the shipped
        // milestone still reads as done.
        let mut p = project();
        p.shipped = true;

        let status = calculate_visibility(&p, false);

        assert_eq!(status.current_level_name, "Hidden");
        let shipped = status
            .milestones
            .iter()
            .find(|m| m.id == "shipped")
            .unwrap();
        assert!(shipped.completed);
        assert_eq!(status.total_completed, 1);
    }

    #[test]
    fn hours_milestone_earns_partial_credit() {
        // Two full milestones (github, hackatime) at 20 points each, plus
        // half of the hours share: 40 + 10 = 50.
        let mut p = connected_project();
        p.hackatime_hours = Some(15.0);

        let status = calculate_visibility(&p, false);

        assert_eq!(status.progress_percentage, 50);
    }

    #[test]
    fn hours_credit_is_capped_at_the_full_share() {
        let mut p = connected_project();
        p.hackatime_hours = Some(90.0);

        let status = calculate_visibility(&p, false);

        // 20 + 20 + 20, not more.
        assert_eq!(status.progress_percentage, 60);
    }

    #[test]
    fn null_hours_read_as_zero() {
        let status = calculate_visibility(&connected_project(), false);

        let hours = status.milestones.iter().find(|m| m.id == "hours").unwrap();
        assert!(!hours.completed);
        assert_eq!(status.progress_percentage, 40);
    }
}
