/// URL builder for the three conversion API endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoints {
    base_url: String,
}

impl UpstreamEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Track metadata lookup by Spotify URL.
    pub fn track_info(&self, spotify_url: &str) -> String {
        format!(
            "{}/spotify/get?url={}",
            self.base_url,
            urlencoding::encode(spotify_url)
        )
    }

    /// Conversion task creation for a track within group `gid`.
    pub fn convert_task(&self, gid: &str, track_id: &str) -> String {
        format!(
            "{}/spotify/mp3-convert-task/{}/{}",
            self.base_url, gid, track_id
        )
    }

    /// Conversion progress for task `tid`.
    pub fn convert_progress(&self, tid: &str) -> String {
        format!("{}/spotify/mp3-convert-progress/{}", self.base_url, tid)
    }

    /// Absolute download URL for a path returned by the progress endpoint.
    pub fn download_url(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_url, relative_path)
    }
}
