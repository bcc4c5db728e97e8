use serde::Deserialize;

/// Default limit on tree depth for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Deepest nesting `serde_json` and `serde_yaml` read back (both stop at 128
/// nested containers). The JSON and YAML entry points never go past it, in
/// either direction, whatever `max_depth` says.
pub const TEXT_MAX_DEPTH: usize = 127;

/// Knobs shared by the encoder, the decoder and the text codecs.
///
/// Deserializable so that a host tool can keep it in its own JSON or YAML
/// configuration; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Keep `coord` on exported nodes instead of dropping it.
    pub keep_coord: bool,
    /// Deepest nesting of the exported form accepted before failing with a
    /// too-deep error. Node objects and arrays each count one level.
    pub max_depth: usize,
    /// Indent JSON output.
    pub pretty: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            keep_coord: false,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }
}

impl CodecOptions {
    #[must_use]
    pub fn with_coord(mut self, keep_coord: bool) -> Self {
        self.keep_coord = keep_coord;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The options the text codecs run with: `max_depth` capped at
    /// [`TEXT_MAX_DEPTH`].
    #[must_use]
    pub fn for_text(&self) -> Self {
        self.clone()
            .with_max_depth(self.max_depth.min(TEXT_MAX_DEPTH))
    }
}
