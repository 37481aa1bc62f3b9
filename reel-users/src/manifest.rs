/// Builds adaptive-streaming manifest URLs.
///
/// `{prefix}{video_id}_,{encoding_suffixes}{suffix}`: the comma list after the
/// id names the encoded variants, the CDN expands it into one multi-bitrate
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUrlBuilder {
    prefix: String,
    encoding_suffixes: String,
    suffix: String,
}

impl ManifestUrlBuilder {
    pub fn new(
        prefix: impl Into<String>,
        encoding_suffixes: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            encoding_suffixes: encoding_suffixes.into(),
            suffix: suffix.into(),
        }
    }

    pub fn build(&self, video_id: &str) -> String {
        format!(
            "{}{}_,{}{}",
            self.prefix, video_id, self.encoding_suffixes, self.suffix
        )
    }
}
