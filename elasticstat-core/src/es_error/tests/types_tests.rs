use crate::es_error::{ShardKey, parse_elasticsearch_error};
use pretty_assertions::assert_eq;

#[test]
fn shard_key_parses_node_index_and_shard() {
    // Arrange
    let raw = "[FXRGwKYMT4uMBr0RSvgyfw][logstash-2014.11.21][3]";

    // Act
    let key = ShardKey::parse(raw);

    // Assert
    assert_eq!(
        key,
        Some(ShardKey {
            node_id: "FXRGwKYMT4uMBr0RSvgyfw".to_string(),
            index: "logstash-2014.11.21".to_string(),
            shard: 3,
        })
    );
}

#[test]
fn shard_key_rejects_other_shapes() {
    assert_eq!(ShardKey::parse("[node][index]"), None);
    assert_eq!(ShardKey::parse("[node][index][x]"), None);
    assert_eq!(ShardKey::parse("[node][index][0][extra]"), None);
    assert_eq!(ShardKey::parse("node][index][0]"), None);
}

#[test]
fn indices_are_collected_from_shard_keys() {
    // Arrange
    let raw = "SearchPhaseExecutionException[failed; shardFailures \
{[a][logs-2][0]: Boom[x]; }{[b][logs-1][1]: Boom[y]; }{[a][logs-2][2]: Boom[z]; }]";

    // Act
    let error = parse_elasticsearch_error(raw).unwrap();

    // Assert
    assert_eq!(error.shard_failures().count(), 3);
    assert_eq!(error.indices(), vec!["logs-1", "logs-2"]);
}
