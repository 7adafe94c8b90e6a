use std::collections::BTreeMap;

/// Descriptor of an externally owned media asset.
///
/// The core only reads these: assets live in a different subsystem (and
/// lifetime) and are referenced from clips by id alone, resolved on demand
/// through [`AssetResolver`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetResource {
    /// Opaque identifier clips refer to.
    pub id: String,
    /// Display name, emitted on serialized asset resources.
    pub name: String,
    /// Media location (URL or path), emitted verbatim.
    pub src: String,
    /// Mime type, e.g. `"audio/m4a"`. Conversion filters on the
    /// `audio/` prefix.
    pub mime_type: String,
    /// Known media duration in seconds, when the owning subsystem has
    /// probed it. `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl AssetResource {
    /// True when the mime type indicates audio content.
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// Injected lookup capability for asset references.
///
/// Validation and serialization consume this instead of owning asset data;
/// implementations may front a database, a project file, or a test fixture.
pub trait AssetResolver {
    /// Resolve an asset id, or `None` when unknown.
    fn resolve(&self, id: &str) -> Option<AssetResource>;

    /// Enumerate every id the resolver knows, in a stable order.
    ///
    /// Used by the validator's unused-asset check; resolvers fronting an
    /// unbounded library may return an empty list to opt out.
    fn asset_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// In-memory resolver over a fixed catalog; the implementation used by the
/// CLI and by tests.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    assets: BTreeMap<String, AssetResource>,
}

impl StaticResolver {
    /// Build a resolver from a catalog. Later duplicates of an id replace
    /// earlier ones.
    pub fn new(assets: impl IntoIterator<Item = AssetResource>) -> Self {
        Self {
            assets: assets.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }
}

impl AssetResolver for StaticResolver {
    fn resolve(&self, id: &str) -> Option<AssetResource> {
        self.assets.get(id).cloned()
    }

    fn asset_ids(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }
}
