use serde::Serialize;
use time::Date;

use crate::domain::models::{Project, UserAddress, UserProfile};

/// Participants must be under this age (in whole years) to ship.
pub const AGE_LIMIT: i32 = 19;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Outcome of an eligibility check. "Ineligible" is an ordinary value, not
/// an error: the route returns it with a 200 so the UI can render every
/// unmet requirement at once.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmissionValidation {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl SubmissionValidation {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Whole years between `birthday` and `today`, counting a year only once
/// the birthday has passed.
pub fn calculate_age(birthday: Date, today: Date) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month() as u8, today.day()) < (birthday.month() as u8, birthday.day()) {
        age -= 1;
    }
    age
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Run every shipping requirement against the current snapshot and collect
/// all violations. The only skip is the profile sub-checks when no profile
/// exists (their fields live on it); every other check runs unconditionally.
///
/// `today` is supplied by the caller so the age arithmetic stays
/// deterministic under test.
pub fn validate_submission(
    project: &Project,
    profile: Option<&UserProfile>,
    address: Option<&UserAddress>,
    today: Date,
) -> SubmissionValidation {
    let mut errors: Vec<ValidationError> = Vec::new();

    match profile {
        None => {
            errors.push(ValidationError::new(
                "profile",
                "User profile is required. Please complete your profile.",
            ));
        }
        Some(profile) => {
            if is_blank(Some(&profile.first_name)) {
                errors.push(ValidationError::new("first_name", "First name is required."));
            }

            match profile.birthday {
                None => {
                    errors.push(ValidationError::new("birthday", "Birthday is required."));
                }
                Some(birthday) => {
                    let age = calculate_age(birthday.date(), today);
                    if age >= AGE_LIMIT {
                        errors.push(ValidationError::new(
                            "age",
                            format!("You must be under {} years old to submit.", AGE_LIMIT),
                        ));
                    }
                }
            }
        }
    }

    match address {
        None => {
            errors.push(ValidationError::new(
                "address",
                "A shipping address is required.",
            ));
        }
        Some(address) => {
            if is_blank(Some(&address.address_line_1)) {
                errors.push(ValidationError::new(
                    "address_line_1",
                    "Address line 1 is required.",
                ));
            }
            if is_blank(address.city.as_deref()) {
                errors.push(ValidationError::new("city", "City is required."));
            }
            if is_blank(address.country.as_deref()) {
                errors.push(ValidationError::new("country", "Country is required."));
            }
            if is_blank(address.post_code.as_deref()) {
                errors.push(ValidationError::new("post_code", "Post/ZIP code is required."));
            }
        }
    }

    if !project.has_hackatime_link() {
        errors.push(ValidationError::new(
            "hackatime_projects",
            "At least one Hackatime project must be linked.",
        ));
    }

    if !project.has_code_link() {
        errors.push(ValidationError::new(
            "code_url",
            "A GitHub repository URL is required.",
        ));
    }

    if is_blank(project.live_url.as_deref()) {
        errors.push(ValidationError::new(
            "live_url",
            "A live/playable project URL is required.",
        ));
    }

    let has_screenshot = project
        .attachment_urls
        .as_deref()
        .is_some_and(|urls| !urls.is_empty());
    if !has_screenshot {
        errors.push(ValidationError::new(
            "screenshot",
            "At least one screenshot is required.",
        ));
    }

    SubmissionValidation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ProjectId, UserId};
    use time::macros::date;
    use time::OffsetDateTime;

    const TODAY: Date = date!(2026 - 08 - 08);

    fn birthday(date: Date) -> Option<OffsetDateTime> {
        Some(date.midnight().assume_utc())
    }

    fn complete_project() -> Project {
        Project {
            project_id: ProjectId::new("p1"),
            user_id: UserId::new("u1"),
            project_name: "Plotter".to_string(),
            project_description: "A pen plotter".to_string(),
            project_type: None,
            attachment_urls: Some(vec!["https://cdn.example.com/shot.png".to_string()]),
            code_url: Some("https://github.com/u1/plotter".to_string()),
            live_url: Some("https://plotter.example.com".to_string()),
            submission_week: "week-2".to_string(),
            shipped: false,
            github_installation_id: None,
            github_repo_path: None,
            hackatime_projects: Some(vec!["plotter".to_string()]),
            hackatime_hours: Some(12.5),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn complete_profile() -> UserProfile {
        UserProfile {
            user_id: UserId::new("u1"),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            birthday: birthday(date!(2010 - 03 - 14)),
        }
    }

    fn complete_address() -> UserAddress {
        UserAddress {
            id: "a1".to_string(),
            user_id: UserId::new("u1"),
            address_line_1: "1 Infinite Loop".to_string(),
            address_line_2: None,
            city: Some("Shelburne".to_string()),
            state: Some("VT".to_string()),
            country: Some("USA".to_string()),
            post_code: Some("05482".to_string()),
            is_primary: true,
        }
    }

    fn fields(result: &SubmissionValidation) -> Vec<&'static str> {
        result.errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn complete_snapshot_is_valid() {
        let result = validate_submission(
            &complete_project(),
            Some(&complete_profile()),
            Some(&complete_address()),
            TODAY,
        );

        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn every_independent_failure_is_reported() {
        // No address, no screenshot, and over the age limit: exactly three
        // violations, not just the first.
        let mut project = complete_project();
        project.attachment_urls = None;

        let mut profile = complete_profile();
        profile.birthday = birthday(date!(2000 - 01 - 01));

        let result = validate_submission(&project, Some(&profile), None, TODAY);

        assert!(!result.valid);
        assert_eq!(fields(&result), vec!["age", "address", "screenshot"]);
    }

    #[test]
    fn missing_profile_skips_only_its_sub_checks() {
        let project = complete_project();
        let result = validate_submission(&project, None, Some(&complete_address()), TODAY);

        assert_eq!(fields(&result), vec!["profile"]);
    }

    #[test]
    fn blank_profile_fields_are_each_reported() {
        let mut profile = complete_profile();
        profile.first_name = "   ".to_string();
        profile.birthday = None;

        let result = validate_submission(
            &complete_project(),
            Some(&profile),
            Some(&complete_address()),
            TODAY,
        );

        assert_eq!(fields(&result), vec!["first_name", "birthday"]);
    }

    #[test]
    fn blank_address_fields_are_each_reported() {
        let mut address = complete_address();
        address.address_line_1 = "".to_string();
        address.city = Some("  ".to_string());
        address.country = None;
        address.post_code = None;

        let result = validate_submission(
            &complete_project(),
            Some(&complete_profile()),
            Some(&address),
            TODAY,
        );

        assert_eq!(
            fields(&result),
            vec!["address_line_1", "city", "country", "post_code"]
        );
    }

    #[test]
    fn empty_and_null_link_lists_both_fail() {
        let mut project = complete_project();
        project.hackatime_projects = Some(vec![]);
        let result = validate_submission(
            &project,
            Some(&complete_profile()),
            Some(&complete_address()),
            TODAY,
        );
        assert_eq!(fields(&result), vec!["hackatime_projects"]);

        project.hackatime_projects = None;
        let result = validate_submission(
            &project,
            Some(&complete_profile()),
            Some(&complete_address()),
            TODAY,
        );
        assert_eq!(fields(&result), vec!["hackatime_projects"]);
    }

    #[test]
    fn verified_repo_path_satisfies_the_code_check() {
        let mut project = complete_project();
        project.code_url = None;
        project.github_repo_path = Some("u1/plotter".to_string());

        let result = validate_submission(
            &project,
            Some(&complete_profile()),
            Some(&complete_address()),
            TODAY,
        );

        assert!(result.valid);
    }

    #[test]
    fn age_is_adjusted_until_the_birthday_passes() {
        // One day before the 19th birthday: still 18.
        assert_eq!(calculate_age(date!(2007 - 08 - 09), TODAY), 18);
        // On the 19th birthday: 19.
        assert_eq!(calculate_age(date!(2007 - 08 - 08), TODAY), 19);
        // Later month in the year still pending.
        assert_eq!(calculate_age(date!(2007 - 12 - 01), TODAY), 18);
    }

    #[test]
    fn day_before_nineteenth_birthday_passes_day_after_fails() {
        let mut profile = complete_profile();

        profile.birthday = birthday(date!(2007 - 08 - 09));
        let result = validate_submission(
            &complete_project(),
            Some(&profile),
            Some(&complete_address()),
            TODAY,
        );
        assert!(result.valid);

        profile.birthday = birthday(date!(2007 - 08 - 07));
        let result = validate_submission(
            &complete_project(),
            Some(&profile),
            Some(&complete_address()),
            TODAY,
        );
        assert_eq!(fields(&result), vec!["age"]);
    }
}
