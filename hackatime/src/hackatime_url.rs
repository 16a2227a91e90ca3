#[derive(Debug, Clone)]
pub struct HackatimeURL(String);

impl AsRef<str> for HackatimeURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl HackatimeURL {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_query(&self, key: &str, value: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}={}", self.0, key, value))
        } else {
            Self(format!("{}?{}={}", self.0, key, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HackatimeURL;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = HackatimeURL::new("https://hackatime.hackclub.com/api/v1/");
        let appended = url.append_path("/users/U123/stats");

        assert_eq!(
            appended.as_ref(),
            "https://hackatime.hackclub.com/api/v1/users/U123/stats"
        );
    }

    #[test]
    fn with_query_uses_separator_for_existing_query() {
        let url = HackatimeURL::new("https://example.com/stats")
            .with_query("features", "projects")
            .with_query("start_date", "2025-06-16");

        assert_eq!(
            url.as_ref(),
            "https://example.com/stats?features=projects&start_date=2025-06-16"
        );
    }
}
