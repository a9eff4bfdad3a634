use serde::Serialize;
use std::collections::BTreeMap;

/// One link of a cause chain: the exception type and its bracketed detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionNode {
    pub name: String,
    pub detail: String,
}

impl ExceptionNode {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// A decomposed exception trace.
///
/// `exceptions` is keyed by the raw `[nodeId][index][shard]` string and is
/// only populated for search-phase failures; every other exception carries
/// its text in `detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElasticsearchError {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub exceptions: BTreeMap<String, Vec<ExceptionNode>>,
}

impl ElasticsearchError {
    /// Shard failures whose key parses as `[nodeId][index][shard]`.
    pub fn shard_failures(&self) -> impl Iterator<Item = ShardFailure<'_>> {
        self.exceptions.iter().filter_map(|(raw, chain)| {
            ShardKey::parse(raw).map(|key| ShardFailure {
                key,
                chain: chain.as_slice(),
            })
        })
    }

    /// Distinct index names named by the shard failures, sorted.
    pub fn indices(&self) -> Vec<String> {
        let mut indices: Vec<String> = self.shard_failures().map(|f| f.key.index).collect();
        indices.sort();
        indices.dedup();
        indices
    }
}

/// Location of one failed shard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardKey {
    pub node_id: String,
    pub index: String,
    pub shard: u32,
}

impl ShardKey {
    /// Parses `[nodeId][index][shard]`.
    pub fn parse(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
        let mut parts = inner.split("][");

        let node_id = parts.next()?;
        let index = parts.next()?;
        let shard = parts.next()?.parse().ok()?;

        if parts.next().is_some() || node_id.is_empty() || index.is_empty() {
            return None;
        }

        Some(Self {
            node_id: node_id.to_string(),
            index: index.to_string(),
            shard,
        })
    }
}

/// A shard key together with its (boring-free) cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardFailure<'a> {
    pub key: ShardKey,
    pub chain: &'a [ExceptionNode],
}
